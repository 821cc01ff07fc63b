// cli/constants.rs — program identity, display level, and console macros.

use std::sync::atomic::{AtomicU32, Ordering};

pub const COMPRESSOR_NAME: &str = "lz4pipe";
pub const LZ4_EXTENSION: &str = crate::config::LZ4_EXTENSION;

// 0 = no output; 1 = errors only; 2 = results (default, downgradable with -q);
// 3 = progress; 4 = verbose
pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(2);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level.
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level, Ordering::Relaxed);
}

/// Formats the version banner printed by `-V` / `--version`.
pub fn welcome_message() -> String {
    format!(
        "*** {} v{} {}-bit, chunked LZ4 pipeline ***\n",
        COMPRESSOR_NAME,
        crate::VERSION_STRING,
        std::mem::size_of::<*const ()>() * 8
    )
}

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr when the display level is at least `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::cli::constants::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
