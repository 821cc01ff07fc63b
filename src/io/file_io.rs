//! File open helpers shared by the pipeline stages and the direct codec.
//!
//! - [`open_src_file`]: opens a source for reading, rejecting directories.
//! - [`create_dst_file`]: creates (or truncates) a target for writing.
//!
//! Both attach the calling [`Stage`] to any failure so the caller can report
//! where it happened.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result, Stage};
use crate::util::is_directory;

/// Opens `path` for reading.
///
/// A directory yields an [`io::ErrorKind::InvalidInput`] error.
pub fn open_src_file(path: &Path, stage: Stage) -> Result<File> {
    if is_directory(path) {
        warn!(path = %path.display(), "is a directory -- ignored");
        return Err(Error::io(
            stage,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{}: is a directory", path.display()),
            ),
        ));
    }
    File::open(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "cannot open source");
        Error::io(stage, e)
    })
}

/// Creates `path` for writing, truncating any existing content.
pub fn create_dst_file(path: &Path, stage: Stage) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| {
            debug!(path = %path.display(), error = %e, "cannot create target");
            Error::io(stage, e)
        })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
