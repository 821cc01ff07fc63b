//! Transform stage: compresses or decompresses each chunk independently.
//!
//! One or more workers consume the primary queue. A worker that has
//! transformed chunk *n* waits on the shared [`SequenceBarrier`] until *n*
//! is the next expected number before emitting it onto the secondary queue,
//! so output order always matches read order. With a single worker on a
//! FIFO queue that wait never blocks.
//!
//! Shutdown: a worker that dequeues the sentinel puts it back for its
//! siblings and exits. The last worker to exit, whether normally, on error,
//! or by unwinding, forwards exactly one sentinel downstream.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, trace};

use crate::error::{Error, Result, Stage};
use crate::io::barrier::SequenceBarrier;
use crate::io::chunk::Chunk;
use crate::io::chunk_codec::{compress_chunk, decompress_chunk};
use crate::io::pipeline::ErrorSink;
use crate::io::queue::HandoffQueue;
use crate::io::Mode;

/// State shared by every transform worker of one run.
pub struct TransformStage<'a> {
    input: &'a HandoffQueue,
    output: &'a HandoffQueue,
    errors: &'a ErrorSink,
    barrier: SequenceBarrier,
    mode: Mode,
    chunk_limit: usize,
    workers: usize,
    /// Workers that have not exited yet.
    active: AtomicUsize,
}

// Retires its worker on every exit path, unwinding included.
struct RetireGuard<'s, 'a>(&'s TransformStage<'a>);

impl Drop for RetireGuard<'_, '_> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            // The chunk this worker held will never be emitted.
            self.0.barrier.abort();
            self.0.input.close();
        }
        self.0.retire();
    }
}

impl<'a> TransformStage<'a> {
    pub fn new(
        input: &'a HandoffQueue,
        output: &'a HandoffQueue,
        errors: &'a ErrorSink,
        mode: Mode,
        chunk_limit: usize,
        workers: usize,
    ) -> Self {
        let workers = workers.max(1);
        TransformStage {
            input,
            output,
            errors,
            barrier: SequenceBarrier::new(),
            mode,
            chunk_limit,
            workers,
            active: AtomicUsize::new(workers),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Next sequence number the barrier will let through.
    pub fn next_expected(&self) -> u64 {
        self.barrier.next_expected()
    }

    /// Body of one worker thread.
    pub fn run_worker(&self, id: usize) {
        let _retire = RetireGuard(self);
        let mut done = 0u64;
        loop {
            let chunk = self.input.dequeue();
            let Some(seq) = chunk.index() else {
                if self.workers > 1 {
                    // Room is guaranteed: the reader is finished and this
                    // worker just freed the slot the sentinel occupied.
                    let _ = self.input.enqueue(chunk);
                }
                break;
            };

            let payload = match self.transform(&chunk) {
                Ok(p) => p,
                Err(e) => {
                    self.fail(e);
                    break;
                }
            };
            trace!(worker = id, seq, in_len = chunk.len(), out_len = payload.len(), "transformed chunk");

            if self.barrier.wait_turn(seq).is_err() {
                // A sibling failed; its error is already reported.
                break;
            }
            if self.output.enqueue(chunk.with_payload(payload)).is_err() {
                debug!(worker = id, seq, "secondary queue closed; stopping");
                self.barrier.abort();
                self.input.close();
                break;
            }
            self.barrier.advance();
            done += 1;
        }
        debug!(worker = id, chunks = done, "transform worker exiting");
    }

    fn transform(&self, chunk: &Chunk) -> Result<Vec<u8>> {
        let data = chunk.payload.as_deref().unwrap_or_default();
        let result = match self.mode {
            Mode::Compress => compress_chunk(data),
            Mode::Decompress => decompress_chunk(data, self.chunk_limit),
        };
        result.map_err(|msg| Error::codec(Stage::Transform, format!("chunk #{}: {}", chunk.seq, msg)))
    }

    fn fail(&self, e: Error) {
        self.errors.report(e);
        self.barrier.abort();
        self.input.close();
    }

    /// Accounts for one worker leaving. The last one forwards the sentinel.
    ///
    /// Also called by the orchestrator for workers that never started.
    pub fn retire(&self) {
        if self.active.fetch_sub(1, Ordering::AcqRel) == 1 {
            // Fails only when the writer already gave up.
            let _ = self.output.enqueue(Chunk::sentinel());
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
