//! Binary entry point for the `lz4pipe` command-line tool.
//!
//! 1. [`parse_args`] processes all flags and builds a [`ParsedArgs`] value.
//! 2. [`run`] dispatches to the selected codec and returns an exit code.
//!
//! Exit code 0 on success (including `--help` and `--version`), 1 on any
//! usage or processing error.

use lz4pipe::cli::args::{parse_args, ParsedArgs};
use lz4pipe::cli::constants::welcome_message;
use lz4pipe::cli::help::{print_bad_usage, print_usage};
use lz4pipe::{displaylevel, process_file, Mode};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Internal diagnostics go to stderr, filtered by `RUST_LOG` (default: warn).
fn init_tracing() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .compact();
    let _ = tracing_subscriber::registry()
        .with(fmt_layer)
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

/// Execute the operation selected by argument parsing.
///
/// Returns the process exit code (0 = success, 1 = error).
fn run(args: ParsedArgs) -> i32 {
    let ParsedArgs {
        prefs,
        mode,
        src,
        dst,
        exe_name,
        ..
    } = args;

    let Some(mode) = mode else {
        print_bad_usage(&exe_name);
        return 1;
    };

    displaylevel!(3, "{}", welcome_message());
    if prefs.is_single_threaded() {
        displaylevel!(3, "Using single-threaded stream mode \n");
    } else {
        displaylevel!(
            3,
            "Using {} workers, blocks of {} KB \n",
            prefs.nb_workers,
            prefs.block_size >> 10
        );
    }
    displaylevel!(4, "{} {} -> {} \n", mode, src.display(), dst.display());

    match process_file(&src, &dst, mode, &prefs) {
        Ok(stats) => {
            match mode {
                Mode::Compress => displaylevel!(
                    2,
                    "Compressed {} bytes into {} bytes ==> {:.2}% \n",
                    stats.bytes_read,
                    stats.bytes_written,
                    stats.ratio_percent()
                ),
                Mode::Decompress => displaylevel!(
                    2,
                    "{}: decoded {} bytes \n",
                    src.display(),
                    stats.bytes_written
                ),
            }
            0
        }
        Err(e) => {
            displaylevel!(1, "Error [{}] in {}: {} \n", e.kind_name(), e.stage(), e);
            1
        }
    }
}

// ── Entry point ──────────────────────────────────────────────────────────────

fn main() {
    init_tracing();

    let args = match parse_args() {
        Ok(a) => a,
        Err(e) => {
            eprintln!("lz4pipe: {}", e);
            let argv0 = std::env::args().next().unwrap_or_else(|| "lz4pipe".to_owned());
            print_bad_usage(lz4pipe::cli::arg_utils::last_name_from_path(&argv0));
            std::process::exit(1);
        }
    };

    if args.show_help {
        print_usage(&args.exe_name);
        std::process::exit(0);
    }
    if args.show_version {
        lz4pipe::displayout!("{}", welcome_message());
        std::process::exit(0);
    }

    let exit_code = run(args);
    std::process::exit(exit_code);
}
