//! File I/O: the chunked pipeline, its stages, and the direct-stream codec.
//!
//! ```text
//! source ─▶ reader ─▶ primary queue ─▶ transform ─▶ secondary queue ─▶ writer ─▶ target
//! ```
//!
//! Stage failures travel out-of-band through the run's error channel, never
//! through the queues. Every stage forwards a sentinel when it exits, so a
//! failure in one stage can never leave another blocked.

pub mod barrier;
pub mod chunk;
pub mod chunk_codec;
pub mod direct;
pub mod file_io;
pub mod framing;
pub mod pipeline;
pub mod prefs;
pub mod queue;
pub mod reader;
pub mod transform;
pub mod validate;
pub mod writer;

// ── Core type re-exports ─────────────────────────────────────────────────────
pub use chunk::Chunk;
pub use prefs::Prefs;
pub use queue::HandoffQueue;

// ── Worker count ─────────────────────────────────────────────────────────────
pub use prefs::default_nb_workers;

// ── Pipeline entry point ─────────────────────────────────────────────────────
pub use pipeline::{run_chunked, RunStats};

/// Direction of one file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Compress,
    Decompress,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Compress => "compress",
            Mode::Decompress => "decompress",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
