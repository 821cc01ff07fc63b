// config.rs — Compile-time configuration constants.
//
// Runtime-tunable values live in `io::prefs::Prefs`; the constants here are
// the defaults and hard limits those preferences are clamped against.

use crate::io::prefs::MB;

// Raw bytes carried by one chunk during compression.
// Can be overridden per run through `Prefs::set_block_size`.
pub const BLOCK_SIZE_DEFAULT: usize = MB;

// Largest block size accepted at compression, and the default limit on what
// one chunk may expand to during decompression. Any file this crate writes
// therefore decompresses without knowing the block size it was made with.
pub const BLOCK_SIZE_MAX: usize = 64 * MB;

// Size in bytes of the length header that precedes every frame on disk.
// base64 of a big-endian u32 is always 8 ASCII characters.
pub const FRAME_HEADER_SIZE: usize = 8;

// Default number of pipeline workers.
// 0 = auto-detect (available parallelism). 1 selects the single-threaded
// direct-stream codec. Can be overridden by the LZ4PIPE_NBWORKERS
// environment variable, or by the -T# command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Maximum number of pipeline workers selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Default number of concurrent transform workers in chunked mode.
// Can be overridden by the LZ4PIPE_TRANSFORM_WORKERS environment variable.
pub const TRANSFORM_WORKERS_DEFAULT: usize = 1;

// Extension every compressed file is expected to carry.
pub const LZ4_EXTENSION: &str = ".lz4";
