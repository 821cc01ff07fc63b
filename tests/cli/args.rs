// Integration tests for src/cli/args.rs — argument parsing
//
// Covers:
//   - environment-derived prefs are kept unless a flag overrides them
//   - -T0 means auto, -T1 selects the direct codec
//   - -q / -v adjust the display level
//   - aggregated short flags

use lz4pipe::cli::args::parse_args_from;
use lz4pipe::cli::constants::{display_level, set_display_level};
use lz4pipe::io::prefs::default_nb_workers;
use lz4pipe::{codec_for, Mode, Prefs};
use std::sync::{Mutex, MutexGuard};

// Parsing writes the global display level; tests in this file take turns.
static LEVEL_LOCK: Mutex<()> = Mutex::new(());

fn serial() -> MutexGuard<'static, ()> {
    LEVEL_LOCK.lock().unwrap_or_else(|e| e.into_inner())
}

fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|s| s.to_string()).collect()
}

#[test]
fn prefs_pass_through_without_flags() {
    let _g = serial();
    let mut base = Prefs::default();
    base.set_nb_workers(5);
    base.set_transform_workers(3);
    let a = parse_args_from(base, "lz4pipe", &argv(&["compress", "a", "b"])).unwrap();
    assert_eq!(a.prefs.nb_workers, 5);
    assert_eq!(a.prefs.transform_workers, 3);
}

#[test]
fn thread_flag_selects_codec() {
    let _g = serial();
    let a = parse_args_from(Prefs::default(), "lz4pipe", &argv(&["-T1", "-z", "a", "b"])).unwrap();
    assert_eq!(codec_for(&a.prefs).name(), "direct");

    let a = parse_args_from(Prefs::default(), "lz4pipe", &argv(&["-T0", "-z", "a", "b"])).unwrap();
    assert_eq!(a.prefs.nb_workers, default_nb_workers().min(lz4pipe::config::NB_WORKERS_MAX));
}

#[test]
fn verbosity_flags_move_display_level() {
    let _g = serial();
    let prev = display_level();
    set_display_level(2);
    parse_args_from(Prefs::default(), "lz4pipe", &argv(&["-qq", "compress", "a", "b"])).unwrap();
    assert_eq!(display_level(), 0);

    set_display_level(2);
    parse_args_from(Prefs::default(), "lz4pipe", &argv(&["-v", "--verbose", "compress", "a", "b"])).unwrap();
    assert_eq!(display_level(), 4);
    set_display_level(prev);
}

#[test]
fn aggregated_flags() {
    let _g = serial();
    let prev = display_level();
    let a = parse_args_from(Prefs::default(), "lz4pipe", &argv(&["-dT3", "x.lz4", "x"])).unwrap();
    assert_eq!(a.mode, Some(Mode::Decompress));
    assert_eq!(a.prefs.nb_workers, 3);
    set_display_level(prev);
}
