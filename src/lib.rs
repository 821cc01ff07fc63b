// lz4pipe — chunked, order-preserving LZ4 file compression

pub mod config;
pub mod error;
pub mod util;
pub mod io;
pub mod codec;
pub mod cli;

// ── Version constants ────────────────────────────────────────────────────────
pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

// ── Top-level re-exports ─────────────────────────────────────────────────────
pub use codec::{codec_for, compress_file, decompress_file, process_file, ChunkedCodec, DirectCodec, FileCodec};
pub use error::{Error, Result, Stage};
pub use io::{Mode, Prefs, RunStats};
