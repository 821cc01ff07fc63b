//! Filesystem utilities shared by validation, the codecs, and the CLI.
//!
//! - [`file_status`]: regular-file / directory checks, mtime propagation
//! - [`file_size`]: size lookups used for run statistics

pub mod file_status;
pub mod file_size;

// ── Re-exports at `util::` level ─────────────────────────────────────────────

pub use file_status::{copy_mtime, is_directory, is_reg_file};

pub use file_size::get_file_size;
