//! File status helpers used by validation and end-of-run bookkeeping.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Returns `true` if `path` refers to a regular file.
///
/// Returns `false` for directories, special files, and paths that do not
/// exist.
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}

/// Copies the modification time of `src` onto `dst`; the access time of
/// `dst` is set to now.
///
/// Returns `Err` if `dst` is not a regular file.
pub fn copy_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    if !is_reg_file(dst) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "copy_mtime: not a regular file",
        ));
    }
    let meta = fs::metadata(src)?;
    let mtime = FileTime::from_last_modification_time(&meta);
    filetime::set_file_times(dst, FileTime::now(), mtime)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
