// cli/help.rs — usage text.

use crate::cli::constants::{display_level, LZ4_EXTENSION};
use crate::config::{NB_WORKERS_DEFAULT, NB_WORKERS_MAX};
use crate::io::prefs::KB;

/// Builds the usage text for `program`.
pub fn usage_text(program: &str) -> String {
    let mut s = String::new();
    s.push_str("Usage : \n");
    s.push_str(&format!(
        "      {} [arg] <compress|decompress> <source> <target> \n",
        program
    ));
    s.push('\n');
    s.push_str("Modes : \n");
    s.push_str(" compress, -z   : compress <source> into <target> \n");
    s.push_str(&format!(
        " decompress, -d : decompress <source> (must end with {}) into <target> \n",
        LZ4_EXTENSION
    ));
    s.push('\n');
    s.push_str("Arguments : \n");
    s.push_str(&format!(
        " -T#    : use # workers (default:{}==auto, max:{}, 1 = single stream) \n",
        NB_WORKERS_DEFAULT, NB_WORKERS_MAX
    ));
    s.push_str(&format!(
        " -B#    : raw bytes per chunk when compressing, K/M suffixes allowed \n          (default: {} KB, max: {} KB; decompression never needs it) \n",
        crate::config::BLOCK_SIZE_DEFAULT / KB,
        crate::config::BLOCK_SIZE_MAX / KB
    ));
    s.push_str(" -q     : suppress results; specify twice to suppress errors too \n");
    s.push_str(" -v     : verbose mode \n");
    s.push_str(" -V     : display version number and exit \n");
    s.push_str(" -h     : display this help and exit \n");
    s.push('\n');
    s.push_str("Environment : \n");
    s.push_str(" LZ4PIPE_NBWORKERS          : default for -T# \n");
    s.push_str(" LZ4PIPE_TRANSFORM_WORKERS  : concurrent transform workers (default: 1) \n");
    s
}

/// Print usage to stderr.
pub fn print_usage(program: &str) {
    eprint!("{}", usage_text(program));
}

/// Print a one-line hint after a usage error, at display level 1.
pub fn print_bad_usage(program: &str) {
    if display_level() >= 1 {
        eprintln!("Incorrect parameters ");
        eprintln!("Try '{} --help' for usage. ", program);
    }
}
