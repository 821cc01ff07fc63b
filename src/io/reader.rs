//! Reader stage: splits the source file into ordered chunks.
//!
//! - Compress: sequential raw blocks of `block_size` bytes, the last one
//!   possibly shorter. An empty file produces no chunks.
//! - Decompress: one chunk per frame of the chunked format, each payload
//!   exactly as long as its header declares.
//!
//! Chunks are numbered from 0 with no gaps. Whatever happens, the stage ends
//! by enqueueing the sentinel; errors go to the run's error channel.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result, Stage};
use crate::io::chunk::Chunk;
use crate::io::file_io::open_src_file;
use crate::io::framing::{read_to_capacity, FrameError, FrameReader};
use crate::io::pipeline::ErrorSink;
use crate::io::queue::HandoffQueue;
use crate::io::Mode;

/// Why the read loop stopped without an error.
enum Stop {
    EndOfFile,
    /// The primary queue was closed by a failing downstream stage.
    Abandoned,
}

pub struct ReaderStage {
    path: PathBuf,
    mode: Mode,
    block_size: usize,
}

// Appends the sentinel on every exit path, unwinding included.
struct SentinelGuard<'q>(&'q HandoffQueue);

impl Drop for SentinelGuard<'_> {
    fn drop(&mut self) {
        // Fails only when downstream already gave up.
        let _ = self.0.enqueue(Chunk::sentinel());
    }
}

impl ReaderStage {
    pub fn new(path: &Path, mode: Mode, block_size: usize) -> Self {
        ReaderStage {
            path: path.to_path_buf(),
            mode,
            block_size: block_size.max(1),
        }
    }

    /// Feeds `out` until end-of-file or error, then enqueues the sentinel.
    /// Returns the number of bytes read from the source.
    pub fn run(&self, out: &HandoffQueue, errors: &ErrorSink) -> u64 {
        let _sentinel = SentinelGuard(out);
        let mut bytes = 0u64;
        let mut seq = 0u64;

        let result = open_src_file(&self.path, Stage::Reader).and_then(|file| match self.mode {
            Mode::Compress => self.read_blocks(file, out, &mut seq, &mut bytes),
            Mode::Decompress => self.read_frames(file, out, &mut seq, &mut bytes),
        });
        match result {
            Ok(Stop::EndOfFile) => debug!(chunks = seq, bytes, "reader reached end of file"),
            Ok(Stop::Abandoned) => debug!(chunks = seq, "reader stopped: primary queue closed"),
            Err(e) => errors.report(e),
        }
        bytes
    }

    fn read_blocks(
        &self,
        mut file: File,
        out: &HandoffQueue,
        seq: &mut u64,
        bytes: &mut u64,
    ) -> Result<Stop> {
        loop {
            let mut buf = vec![0u8; self.block_size];
            let n = read_to_capacity(&mut file, &mut buf).map_err(|e| Error::io(Stage::Reader, e))?;
            if n == 0 {
                return Ok(Stop::EndOfFile);
            }
            buf.truncate(n);
            *bytes += n as u64;
            trace!(seq = *seq, len = n, "read block");
            if out.enqueue(Chunk::new(*seq, buf)).is_err() {
                return Ok(Stop::Abandoned);
            }
            *seq += 1;
            if n < self.block_size {
                return Ok(Stop::EndOfFile);
            }
        }
    }

    fn read_frames(
        &self,
        file: File,
        out: &HandoffQueue,
        seq: &mut u64,
        bytes: &mut u64,
    ) -> Result<Stop> {
        let mut frames = FrameReader::new(BufReader::new(file));
        let stop = loop {
            let next = frames.next_frame();
            *bytes = frames.bytes_read();
            let payload = match next {
                Ok(Some(payload)) => payload,
                Ok(None) => break Stop::EndOfFile,
                Err(FrameError::Io(e)) => return Err(Error::io(Stage::Reader, e)),
                Err(e) => {
                    return Err(Error::codec(
                        Stage::Reader,
                        format!("frame #{}: {}", *seq, e),
                    ))
                }
            };
            trace!(seq = *seq, len = payload.len(), "read frame");
            if out.enqueue(Chunk::new(*seq, payload)).is_err() {
                break Stop::Abandoned;
            }
            *seq += 1;
        };
        Ok(stop)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
