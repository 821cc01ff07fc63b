//! Command-line argument parsing.
//!
//! The entry points are [`parse_args`] (reads `std::env::args()`) and
//! [`parse_args_from`] (takes an explicit slice, suitable for unit-testing).
//!
//! Accepted forms:
//!
//! ```text
//! lz4pipe [options] compress   <source> <target>
//! lz4pipe [options] decompress <source> <target>
//! lz4pipe [options] -z|-d      <source> <target>
//! ```
//!
//! Short flags without values may be aggregated (`-qq`, `-vz`). `-T#` and
//! `-B#` take their value inline. A bare `--` ends option parsing.
//! Help (`-h`, `-H`, `--help`, `/?`) must be the only argument.
//! Unrecognised options and wrong arity return an `Err` beginning with
//! `"bad usage: "`.

use std::path::PathBuf;

use anyhow::{anyhow, bail};

use crate::cli::arg_utils::{long_command_w_arg, parse_count, read_count};
use crate::cli::constants::{display_level, set_display_level};
use crate::cli::op_mode::{is_help_request, mode_from_word};
use crate::io::prefs::Prefs;
use crate::io::Mode;

/// Everything the binary needs to run one operation.
#[derive(Debug)]
pub struct ParsedArgs {
    /// Run preferences: environment defaults overridden by flags.
    pub prefs: Prefs,
    /// `None` only when `exit_early` is set.
    pub mode: Option<Mode>,
    pub src: PathBuf,
    pub dst: PathBuf,
    /// Usage was requested.
    pub show_help: bool,
    /// Version was requested.
    pub show_version: bool,
    /// Program name (argv[0] basename), used by help functions.
    pub exe_name: String,
}

impl ParsedArgs {
    /// A help or version flag was processed; the caller should exit 0
    /// without performing any file operation.
    pub fn exit_early(&self) -> bool {
        self.show_help || self.show_version
    }
}

/// Parse `std::env::args()` (skipping argv[0]), starting from the
/// environment-derived preferences.
pub fn parse_args() -> anyhow::Result<ParsedArgs> {
    let exe_name = std::env::args().next().unwrap_or_default();
    let argv: Vec<String> = std::env::args().skip(1).collect();
    parse_args_from(Prefs::from_env(), &exe_name, &argv)
}

fn set_mode(slot: &mut Option<Mode>, mode: Mode) -> anyhow::Result<()> {
    match *slot {
        Some(m) if m != mode => bail!("bad usage: both compress and decompress requested"),
        _ => {
            *slot = Some(mode);
            Ok(())
        }
    }
}

/// Parse an explicit argument list.
///
/// `exe_name` is argv[0] (used for help text). `argv` is argv[1..].
pub fn parse_args_from(mut prefs: Prefs, exe_name: &str, argv: &[String]) -> anyhow::Result<ParsedArgs> {
    let mut mode: Option<Mode> = None;
    let mut positionals: Vec<&str> = Vec::new();
    let mut show_help = false;
    let mut show_version = false;
    let mut all_arguments_are_files = false;
    let mut level = display_level();

    for argument in argv {
        let argument = argument.as_str();

        if all_arguments_are_files || !argument.starts_with('-') || argument == "-" {
            if !all_arguments_are_files && is_help_request(argument) {
                show_help = true;
            } else {
                positionals.push(argument);
            }
            continue;
        }

        if is_help_request(argument) {
            show_help = true;
            continue;
        }

        // ── Long options ─────────────────────────────────────────────────────
        if let Some(long) = argument.strip_prefix("--") {
            if long.is_empty() {
                all_arguments_are_files = true;
            } else if long == "version" {
                show_version = true;
            } else if long == "verbose" {
                level += 1;
            } else if long == "quiet" {
                level = level.saturating_sub(1);
            } else if let Some(v) = long_command_w_arg(argument, "--threads=") {
                let n = parse_count(v).ok_or_else(|| anyhow!("bad usage: invalid thread count '{}'", v))?;
                prefs.set_nb_workers(n);
            } else if let Some(v) = long_command_w_arg(argument, "--block-size=") {
                let n = parse_count(v).ok_or_else(|| anyhow!("bad usage: invalid block size '{}'", v))?;
                prefs.set_block_size(n);
            } else {
                bail!("bad usage: unknown option {}", argument);
            }
            continue;
        }

        // ── Short options, possibly aggregated ───────────────────────────────
        let mut rest = &argument[1..];
        while let Some(c) = rest.chars().next() {
            rest = &rest[c.len_utf8()..];
            match c {
                'z' => set_mode(&mut mode, Mode::Compress)?,
                'd' => set_mode(&mut mode, Mode::Decompress)?,
                'q' => level = level.saturating_sub(1),
                'v' => level += 1,
                'V' => show_version = true,
                'h' | 'H' => show_help = true,
                'T' => {
                    let (n, after) = read_count(rest)
                        .ok_or_else(|| anyhow!("bad usage: -T requires a number"))?;
                    prefs.set_nb_workers(n);
                    rest = after;
                }
                'B' => {
                    let (n, after) = read_count(rest)
                        .ok_or_else(|| anyhow!("bad usage: -B requires a size"))?;
                    prefs.set_block_size(n);
                    rest = after;
                }
                other => bail!("bad usage: unknown option -{}", other),
            }
        }
    }

    if show_help && argv.len() > 1 {
        bail!("bad usage: help must be the only argument");
    }

    set_display_level(level);

    let exe_name = crate::cli::arg_utils::last_name_from_path(exe_name).to_owned();
    if show_help || show_version {
        return Ok(ParsedArgs {
            prefs,
            mode,
            src: PathBuf::new(),
            dst: PathBuf::new(),
            show_help,
            show_version,
            exe_name,
        });
    }

    // The mode word occupies the first positional slot unless a flag set it.
    let mut paths = positionals.as_slice();
    if mode.is_none() {
        let (first, tail) = paths
            .split_first()
            .ok_or_else(|| anyhow!("bad usage: missing mode (compress or decompress)"))?;
        let m = mode_from_word(first)
            .ok_or_else(|| anyhow!("bad usage: unknown mode '{}'", first))?;
        mode = Some(m);
        paths = tail;
    }

    match paths {
        [src, dst] => Ok(ParsedArgs {
            prefs,
            mode,
            src: PathBuf::from(*src),
            dst: PathBuf::from(*dst),
            show_help,
            show_version,
            exe_name,
        }),
        [] | [_] => bail!("bad usage: expected <source> and <target>"),
        [_, _, extra, ..] => bail!("bad usage: unexpected argument '{}'", extra),
    }
}
