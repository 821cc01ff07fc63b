//! Chunked pipeline orchestration for one file operation.
//!
//! Wires the three stages together:
//!
//! 1. The reader splits the source into numbered chunks on the primary
//!    queue.
//! 2. Transform workers compress or decompress each chunk independently and
//!    re-serialize them onto the secondary queue through the ordering
//!    barrier.
//! 3. The writer drains the secondary queue in order into the target.
//!
//! Both queues, the barrier, and the error channel belong to a single run;
//! nothing is shared with other runs in the process. Every stage thread is
//! joined before the run's errors are collected, and the first reported
//! error becomes the result.

use std::any::Any;
use std::io;
use std::path::Path;
use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::error::{Error, Result, Stage};
use crate::io::chunk::Chunk;
use crate::io::prefs::Prefs;
use crate::io::queue::HandoffQueue;
use crate::io::reader::ReaderStage;
use crate::io::transform::TransformStage;
use crate::io::writer::{WriteStats, WriterStage};
use crate::io::Mode;

// ---------------------------------------------------------------------------
// ErrorSink: the run's out-of-band error channel
// ---------------------------------------------------------------------------

/// Sending half of a run's error channel. Each stage reports a failure here
/// exactly once and then unwinds; the orchestrator drains the receiving half
/// after joining every stage.
#[derive(Clone, Debug)]
pub struct ErrorSink {
    tx: Sender<Error>,
}

impl ErrorSink {
    /// Creates a connected sink / receiver pair.
    pub fn channel() -> (ErrorSink, Receiver<Error>) {
        let (tx, rx) = unbounded();
        (ErrorSink { tx }, rx)
    }

    pub fn report(&self, err: Error) {
        debug!(stage = %err.stage(), error = %err, "stage error reported");
        // The receiver outlives every stage of the run.
        let _ = self.tx.send(err);
    }
}

/// Totals for one completed file operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Bytes consumed from the source file.
    pub bytes_read: u64,
    /// Bytes written to the target file.
    pub bytes_written: u64,
    /// Chunks written. Always 0 for the direct-stream codec.
    pub chunks: u64,
}

impl RunStats {
    /// Output size as a percentage of input size.
    pub fn ratio_percent(&self) -> f64 {
        self.bytes_written as f64 / self.bytes_read.max(1) as f64 * 100.0
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "thread panicked".to_owned())
}

fn spawn_failed(stage: Stage, e: io::Error) -> Error {
    Error::Stage {
        stage,
        message: format!("cannot spawn thread: {}", e),
    }
}

// ---------------------------------------------------------------------------
// run_chunked: one run of the three-stage pipeline
// ---------------------------------------------------------------------------

/// Runs the chunked pipeline from `src` to `dst`.
///
/// Preconditions are not checked here; see [`crate::io::validate`]. The
/// target is created (or truncated) by the writer and is left as written
/// if the run fails.
pub fn run_chunked(src: &Path, dst: &Path, mode: Mode, prefs: &Prefs) -> Result<RunStats> {
    let capacity = prefs.queue_capacity();
    let primary = HandoffQueue::new(capacity);
    let secondary = HandoffQueue::new(capacity);
    let (errors, error_rx) = ErrorSink::channel();

    let reader = ReaderStage::new(src, mode, prefs.block_size);
    let writer = WriterStage::new(dst, mode);
    let transform = TransformStage::new(
        &primary,
        &secondary,
        &errors,
        mode,
        prefs.chunk_limit,
        prefs.transform_workers,
    );

    debug!(
        %mode,
        src = %src.display(),
        dst = %dst.display(),
        capacity,
        transform_workers = transform.workers(),
        block_size = prefs.block_size,
        chunk_limit = prefs.chunk_limit,
        "starting pipeline"
    );

    let (bytes_read, written) = thread::scope(|s| {
        let errors = &errors;
        let transform = &transform;

        // Writer first: once it runs, every other failure can be unwound
        // through sentinels.
        let writer_handle = match thread::Builder::new()
            .name("lz4pipe-writer".into())
            .spawn_scoped(s, || writer.run(&secondary, errors))
        {
            Ok(h) => h,
            Err(e) => {
                errors.report(spawn_failed(Stage::Writer, e));
                return (0, WriteStats::default());
            }
        };

        let mut transform_handles = Vec::with_capacity(transform.workers());
        for id in 0..transform.workers() {
            match thread::Builder::new()
                .name(format!("lz4pipe-transform-{}", id))
                .spawn_scoped(s, move || transform.run_worker(id))
            {
                Ok(h) => transform_handles.push(h),
                Err(e) => {
                    errors.report(spawn_failed(Stage::Transform, e));
                    // Stops the reader and any worker already running.
                    primary.close();
                    for _ in id..transform.workers() {
                        transform.retire();
                    }
                    break;
                }
            }
        }

        let reader_handle = thread::Builder::new()
            .name("lz4pipe-reader".into())
            .spawn_scoped(s, || reader.run(&primary, errors));
        let reader_handle = match reader_handle {
            Ok(h) => Some(h),
            Err(e) => {
                errors.report(spawn_failed(Stage::Reader, e));
                // The queue is still empty, so this never blocks.
                let _ = primary.enqueue(Chunk::sentinel());
                None
            }
        };

        let bytes_read = match reader_handle.map(|h| h.join()) {
            Some(Ok(n)) => n,
            Some(Err(p)) => {
                errors.report(Error::Stage {
                    stage: Stage::Reader,
                    message: panic_message(p),
                });
                0
            }
            None => 0,
        };
        for h in transform_handles {
            if let Err(p) = h.join() {
                errors.report(Error::Stage {
                    stage: Stage::Transform,
                    message: panic_message(p),
                });
            }
        }
        let written = writer_handle.join().unwrap_or_else(|p| {
            errors.report(Error::Stage {
                stage: Stage::Writer,
                message: panic_message(p),
            });
            WriteStats::default()
        });
        (bytes_read, written)
    });

    drop(transform);
    drop(errors);
    let mut reported = error_rx.try_iter();
    if let Some(first) = reported.next() {
        for other in reported {
            warn!(stage = %other.stage(), error = %other, "additional stage error");
        }
        return Err(first);
    }

    let stats = RunStats {
        bytes_read,
        bytes_written: written.bytes,
        chunks: written.chunks,
    };
    debug!(?stats, "pipeline finished");
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
