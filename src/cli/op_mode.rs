//! Operation mode selection for the CLI.
//!
//! The mode is given either as a word (`compress`, `decompress`) in the first
//! positional slot, or as a flag (`-z`, `-d`) anywhere before the paths.

use crate::io::Mode;

/// Maps a mode word or its flag alias to a [`Mode`].
pub fn mode_from_word(word: &str) -> Option<Mode> {
    match word {
        "compress" | "-z" => Some(Mode::Compress),
        "decompress" | "-d" => Some(Mode::Decompress),
        _ => None,
    }
}

/// `true` when `arg` asks for usage text.
pub fn is_help_request(arg: &str) -> bool {
    matches!(arg, "-h" | "-H" | "--help" | "/?")
}
