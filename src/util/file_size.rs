//! File size helpers.

use std::fs;
use std::path::Path;

/// Returns the size in bytes of the regular file at `path`.
///
/// Returns `0` if the path does not exist, is not a regular file, or cannot
/// be stat-ted.
pub fn get_file_size(path: &Path) -> u64 {
    fs::metadata(path)
        .ok()
        .filter(|m| m.file_type().is_file())
        .map(|m| m.len())
        .unwrap_or(0)
}
