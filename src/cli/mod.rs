//! Command-line interface for the `lz4pipe` binary.
//!
//! | Submodule     | Responsibility |
//! |---------------|---------------|
//! | [`constants`] | Program identity, the `DISPLAY_LEVEL` atomic, and the console macros. |
//! | [`help`]      | Usage text. |
//! | [`arg_utils`] | Count parsing with size suffixes, long-option prefixes. |
//! | [`op_mode`]   | Mode words, flag aliases, and help spellings. |
//! | [`args`]      | `ParsedArgs` and the argument loop. |
//!
//! Typical call sequence: `parse_args` → `codec::process_file`.

pub mod constants;
pub mod help;
pub mod arg_utils;
pub mod op_mode;
pub mod args;
