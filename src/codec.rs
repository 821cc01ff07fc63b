//! File-level codecs.
//!
//! Two interchangeable implementations sit behind [`FileCodec`]:
//!
//! - [`ChunkedCodec`]: the three-stage pipeline writing the framed format;
//! - [`DirectCodec`]: a single LZ4 frame stream, no threads.
//!
//! [`codec_for`] picks one from the worker count in [`Prefs`]. Both validate
//! their arguments before touching the filesystem.

use std::path::Path;

use tracing::{debug, warn};

use crate::error::Result;
use crate::io::direct::{compress_stream, decompress_stream};
use crate::io::pipeline::{run_chunked, RunStats};
use crate::io::prefs::Prefs;
use crate::io::validate::validate_paths;
use crate::io::Mode;
use crate::util::copy_mtime;

/// Whole-file compression and decompression.
pub trait FileCodec {
    /// Compresses `src` into `dst`, creating or truncating `dst`.
    fn compress(&self, src: &Path, dst: &Path) -> Result<RunStats>;

    /// Decompresses `src` into `dst`. `src` must carry the `.lz4` extension.
    fn decompress(&self, src: &Path, dst: &Path) -> Result<RunStats>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

fn finish(src: &Path, dst: &Path, preserve_mtime: bool) {
    if preserve_mtime {
        if let Err(e) = copy_mtime(src, dst) {
            warn!(dst = %dst.display(), error = %e, "cannot copy modification time");
        }
    }
}

/// Chunked, order-preserving pipeline codec.
#[derive(Debug, Clone)]
pub struct ChunkedCodec {
    prefs: Prefs,
}

impl ChunkedCodec {
    pub fn new(prefs: Prefs) -> Self {
        ChunkedCodec { prefs }
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    fn run(&self, src: &Path, dst: &Path, mode: Mode) -> Result<RunStats> {
        validate_paths(src, dst, mode)?;
        let stats = run_chunked(src, dst, mode, &self.prefs)?;
        finish(src, dst, self.prefs.preserve_mtime);
        Ok(stats)
    }
}

impl FileCodec for ChunkedCodec {
    fn compress(&self, src: &Path, dst: &Path) -> Result<RunStats> {
        self.run(src, dst, Mode::Compress)
    }

    fn decompress(&self, src: &Path, dst: &Path) -> Result<RunStats> {
        self.run(src, dst, Mode::Decompress)
    }

    fn name(&self) -> &'static str {
        "chunked"
    }
}

/// Single-threaded whole-stream codec.
#[derive(Debug, Clone)]
pub struct DirectCodec {
    preserve_mtime: bool,
}

impl DirectCodec {
    pub fn new(preserve_mtime: bool) -> Self {
        DirectCodec { preserve_mtime }
    }
}

impl Default for DirectCodec {
    fn default() -> Self {
        DirectCodec::new(true)
    }
}

impl FileCodec for DirectCodec {
    fn compress(&self, src: &Path, dst: &Path) -> Result<RunStats> {
        validate_paths(src, dst, Mode::Compress)?;
        let stats = compress_stream(src, dst)?;
        finish(src, dst, self.preserve_mtime);
        Ok(stats)
    }

    fn decompress(&self, src: &Path, dst: &Path) -> Result<RunStats> {
        validate_paths(src, dst, Mode::Decompress)?;
        let stats = decompress_stream(src, dst)?;
        finish(src, dst, self.preserve_mtime);
        Ok(stats)
    }

    fn name(&self) -> &'static str {
        "direct"
    }
}

/// Selects the codec for `prefs`: one worker means the direct codec,
/// anything else the chunked pipeline.
pub fn codec_for(prefs: &Prefs) -> Box<dyn FileCodec> {
    let codec: Box<dyn FileCodec> = if prefs.is_single_threaded() {
        Box::new(DirectCodec::new(prefs.preserve_mtime))
    } else {
        Box::new(ChunkedCodec::new(prefs.clone()))
    };
    debug!(codec = codec.name(), nb_workers = prefs.nb_workers, "codec selected");
    codec
}

/// Runs one file operation with the codec selected for `prefs`.
pub fn process_file(src: &Path, dst: &Path, mode: Mode, prefs: &Prefs) -> Result<RunStats> {
    let codec = codec_for(prefs);
    match mode {
        Mode::Compress => codec.compress(src, dst),
        Mode::Decompress => codec.decompress(src, dst),
    }
}

/// Compresses `src` into `dst` with the codec selected for `prefs`.
pub fn compress_file(src: &Path, dst: &Path, prefs: &Prefs) -> Result<RunStats> {
    process_file(src, dst, Mode::Compress, prefs)
}

/// Decompresses `src` into `dst` with the codec selected for `prefs`.
pub fn decompress_file(src: &Path, dst: &Path, prefs: &Prefs) -> Result<RunStats> {
    process_file(src, dst, Mode::Decompress, prefs)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
