// arg_utils.rs — low-level helpers for the argument loop.

use std::path::Path;

/// Returns the file name component of `path`, or `path` itself when it has
/// none. Used to print the program name in usage text.
pub fn last_name_from_path(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

/// Parses an unsigned count from the start of `s`, with an optional size
/// suffix, and returns it with the unconsumed remainder.
///
/// Suffixes: `K`, `M`, `G`, each optionally followed by `i` and/or `B`
/// (`64K`, `64KB`, `64KiB`). Returns `None` when `s` does not start with a
/// digit or the value overflows `usize`.
pub fn read_count(s: &str) -> Option<(usize, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let mut value: usize = s[..digits].parse().ok()?;
    let mut rest = &s[digits..];

    let shift = match rest.as_bytes().first() {
        Some(b'K') => 10,
        Some(b'M') => 20,
        Some(b'G') => 30,
        _ => 0,
    };
    if shift > 0 {
        value = value.checked_mul(1usize << shift)?;
        rest = &rest[1..];
        rest = rest.strip_prefix('i').unwrap_or(rest);
        rest = rest.strip_prefix('B').unwrap_or(rest);
    }
    Some((value, rest))
}

/// Parses a whole argument as a count; trailing characters are an error.
pub fn parse_count(s: &str) -> Option<usize> {
    match read_count(s) {
        Some((n, "")) => Some(n),
        _ => None,
    }
}

/// If `arg` starts with `prefix`, returns what follows it.
pub fn long_command_w_arg<'a>(arg: &'a str, prefix: &str) -> Option<&'a str> {
    arg.strip_prefix(prefix)
}
