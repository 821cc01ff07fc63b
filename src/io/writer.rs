//! Writer stage: serializes transformed chunks to the target file in order.
//!
//! - Compress: each payload is written as a frame (8-byte length header,
//!   then the payload).
//! - Decompress: payloads are written verbatim.
//!
//! The target is held open for the whole run and released on every exit
//! path. A partially written target is left in place on failure.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Error, Result, Stage};
use crate::io::file_io::create_dst_file;
use crate::io::framing::{write_frame, FrameError};
use crate::io::pipeline::ErrorSink;
use crate::io::queue::HandoffQueue;
use crate::io::Mode;

// ---------------------------------------------------------------------------
// ReorderRegister: ordering barrier of the writer
//
// Chunks are buffered under their sequence number and drained strictly in
// ascending order. A chunk that arrives ahead of its turn waits in the
// register until the gap before it fills.
// ---------------------------------------------------------------------------

/// Buffers out-of-order chunks and drains them to the writer in sequence.
#[derive(Debug, Default)]
pub struct ReorderRegister {
    /// Next sequence number expected to be written.
    expected: u64,
    /// Chunks that arrived ahead of their turn.
    pending: BTreeMap<u64, Vec<u8>>,
}

impl ReorderRegister {
    /// Creates a register expecting sequence number 0 first.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Number of chunks waiting for an earlier one.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Stores a chunk payload under its sequence number.
    pub fn insert(&mut self, seq: u64, payload: Vec<u8>) {
        self.pending.insert(seq, payload);
    }

    /// Hands every buffered chunk that continues the unbroken sequence from
    /// `expected` to `write_fn`, in ascending order. Stops at the first gap.
    pub fn drain_in_order<E>(
        &mut self,
        write_fn: &mut dyn FnMut(u64, &[u8]) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        while let Some(entry) = self.pending.first_entry() {
            if *entry.key() != self.expected {
                break;
            }
            let data = entry.remove();
            write_fn(self.expected, &data)?;
            self.expected += 1;
        }
        Ok(())
    }
}

/// Totals reported by the writer at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteStats {
    pub chunks: u64,
    pub bytes: u64,
}

pub struct WriterStage {
    path: PathBuf,
    mode: Mode,
}

// Closes the input queue unless the stage finished cleanly, so upstream
// never blocks on a writer that is gone.
struct CloseGuard<'q> {
    input: &'q HandoffQueue,
    finished: bool,
}

impl Drop for CloseGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.input.close();
        }
    }
}

impl WriterStage {
    pub fn new(path: &Path, mode: Mode) -> Self {
        WriterStage {
            path: path.to_path_buf(),
            mode,
        }
    }

    /// Consumes `input` until the sentinel, writing each chunk in order.
    pub fn run(&self, input: &HandoffQueue, errors: &ErrorSink) -> WriteStats {
        let mut guard = CloseGuard {
            input,
            finished: false,
        };
        let mut stats = WriteStats::default();
        match self.write_all(input, &mut stats) {
            Ok(()) => {
                guard.finished = true;
                debug!(chunks = stats.chunks, bytes = stats.bytes, "writer finished");
            }
            Err(e) => errors.report(e),
        }
        stats
    }

    fn write_all(&self, input: &HandoffQueue, stats: &mut WriteStats) -> Result<()> {
        let file = create_dst_file(&self.path, Stage::Writer)?;
        let mut out = BufWriter::new(file);
        let mut register = ReorderRegister::new();

        loop {
            let chunk = input.dequeue();
            let Some(seq) = chunk.index() else {
                break;
            };
            register.insert(seq, chunk.payload.unwrap_or_default());
            register.drain_in_order(&mut |seq, payload| {
                let n = self.write_chunk(&mut out, payload)?;
                trace!(seq, len = n, "wrote chunk");
                stats.chunks += 1;
                stats.bytes += n;
                Ok::<(), Error>(())
            })?;
        }

        if register.pending() > 0 {
            return Err(Error::codec(
                Stage::Writer,
                format!(
                    "stream ended with {} chunk(s) still waiting for chunk #{}",
                    register.pending(),
                    register.expected()
                ),
            ));
        }
        out.flush().map_err(|e| Error::io(Stage::Writer, e))?;
        Ok(())
    }

    fn write_chunk(&self, out: &mut BufWriter<File>, payload: &[u8]) -> Result<u64> {
        match self.mode {
            Mode::Compress => write_frame(out, payload).map_err(|e| match e {
                FrameError::Io(e) => Error::io(Stage::Writer, e),
                other => Error::codec(Stage::Writer, other.to_string()),
            }),
            Mode::Decompress => out
                .write_all(payload)
                .map(|()| payload.len() as u64)
                .map_err(|e: io::Error| Error::io(Stage::Writer, e)),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
