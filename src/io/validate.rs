//! Precondition checks run before any stage thread starts.
//!
//! Failures here are returned synchronously as ordinary errors; they never
//! go through a run's error channel.

use std::path::Path;

use crate::config::LZ4_EXTENSION;
use crate::error::{Error, Result};
use crate::io::Mode;
use crate::util::is_directory;

fn is_blank(path: &Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}

/// Returns `true` if the file name of `path` ends with `.lz4`.
pub fn has_lz4_extension(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy().ends_with(LZ4_EXTENSION))
        .unwrap_or(false)
}

/// Checks the arguments of one file operation.
///
/// In order:
/// 1. neither path may be blank ([`Error::Argument`]);
/// 2. the source must exist ([`Error::FileNotFound`]) and not be a
///    directory ([`Error::Argument`]);
/// 3. a source to decompress must carry the `.lz4` extension
///    ([`Error::Format`]), whichever internal format it actually holds.
pub fn validate_paths(src: &Path, dst: &Path, mode: Mode) -> Result<()> {
    if is_blank(src) {
        return Err(Error::Argument("source path is empty".into()));
    }
    if is_blank(dst) {
        return Err(Error::Argument("target path is empty".into()));
    }
    if !src.exists() {
        return Err(Error::FileNotFound(src.to_path_buf()));
    }
    if is_directory(src) {
        return Err(Error::Argument(format!("{} is a directory", src.display())));
    }
    if mode == Mode::Decompress && !has_lz4_extension(src) {
        return Err(Error::Format {
            path: src.to_path_buf(),
            expected: LZ4_EXTENSION,
        });
    }
    Ok(())
}
