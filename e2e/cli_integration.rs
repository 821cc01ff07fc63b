// e2e/cli_integration.rs — CLI integration tests
//
// Tests the `lz4pipe` binary as a black-box CLI tool using std::process::Command.
// Covers mode words and flag aliases, worker options, help and version,
// exit codes, and error diagnostics.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

/// Locate the `lz4pipe` binary produced by Cargo.
fn lz4pipe_bin() -> PathBuf {
    if let Ok(p) = std::env::var("CARGO_BIN_EXE_lz4pipe") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop();
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("lz4pipe");
    p
}

fn run(args: &[&str]) -> Output {
    Command::new(lz4pipe_bin())
        .args(args)
        .env_remove("LZ4PIPE_NBWORKERS")
        .env_remove("LZ4PIPE_TRANSFORM_WORKERS")
        .output()
        .expect("failed to run lz4pipe")
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

/// Create a TempDir containing a text file with ~40 KB of content.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "Hello, chunked LZ4!\n".repeat(2000)).unwrap();
    (dir, input)
}

// ── 1. Round trips ───────────────────────────────────────────────────────────

#[test]
fn test_cli_mode_words_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("input.txt.lz4");
    let back = dir.path().join("back.txt");

    let out = run(&["-T4", "-B4K", "compress", s(&input), s(&packed)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let out = run(&["-T4", "-B4K", "decompress", s(&packed), s(&back)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    assert_eq!(fs::read(&input).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn test_cli_flag_aliases_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("alias.lz4");
    let back = dir.path().join("alias.txt");

    assert!(run(&["-z", s(&input), s(&packed)]).status.success());
    assert!(run(&["-d", s(&packed), s(&back)]).status.success());
    assert_eq!(fs::read(&input).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn test_cli_single_thread_roundtrip() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("single.lz4");
    let back = dir.path().join("single.txt");

    assert!(run(&["-T1", "compress", s(&input), s(&packed)]).status.success());
    // Plain LZ4 frame magic number.
    assert_eq!(&fs::read(&packed).unwrap()[..4], &[0x04, 0x22, 0x4D, 0x18]);
    assert!(run(&["--threads=1", "decompress", s(&packed), s(&back)]).status.success());
    assert_eq!(fs::read(&input).unwrap(), fs::read(&back).unwrap());
}

#[test]
fn test_cli_prints_summary() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("summary.lz4");
    let out = run(&["compress", s(&input), s(&packed)]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Compressed 40000 bytes into"), "{}", stderr);
}

#[test]
fn test_cli_quiet_suppresses_summary() {
    let (dir, input) = make_temp_input();
    let packed = dir.path().join("quiet.lz4");
    let out = run(&["-q", "compress", s(&input), s(&packed)]);
    assert!(out.status.success());
    assert!(!String::from_utf8_lossy(&out.stderr).contains("Compressed"));
}

#[test]
fn test_cli_large_blocks_decompress_without_block_flag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("big.bin");
    let packed = dir.path().join("big.bin.lz4");
    let back = dir.path().join("big.out");
    let data: Vec<u8> = (0..3u32 << 20).map(|i| (i / 7 % 253) as u8).collect();
    fs::write(&input, &data).unwrap();

    let out = run(&["-T4", "-B2M", "compress", s(&input), s(&packed)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let out = run(&["-T4", "decompress", s(&packed), s(&back)]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&back).unwrap(), data);
}

// ── 2. Help and version ──────────────────────────────────────────────────────

#[test]
fn test_cli_help_exits_zero() {
    for flag in ["-h", "--help", "/?"] {
        let out = run(&[flag]);
        assert_eq!(out.status.code(), Some(0), "{}", flag);
        assert!(String::from_utf8_lossy(&out.stderr).contains("Usage"), "{}", flag);
    }
}

#[test]
fn test_cli_version() {
    let out = run(&["--version"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("lz4pipe"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── 3. Usage errors ──────────────────────────────────────────────────────────

#[test]
fn test_cli_usage_errors_exit_one() {
    let (dir, input) = make_temp_input();
    let target = dir.path().join("t.lz4");
    let cases: Vec<Vec<&str>> = vec![
        vec![],
        vec!["compress"],
        vec!["compress", s(&input)],
        vec!["squash", s(&input), s(&target)],
        vec!["--bogus", "compress", s(&input), s(&target)],
        vec!["compress", s(&input), s(&target), "extra"],
        vec!["compress", s(&input), s(&target), "-h"],
        vec!["--help", "compress", s(&input), s(&target)],
    ];
    for args in cases {
        let out = run(&args);
        assert_eq!(out.status.code(), Some(1), "{:?}", args);
        assert!(String::from_utf8_lossy(&out.stderr).contains("bad usage"), "{:?}", args);
    }
    assert!(!target.exists());
}

// ── 4. Processing errors name kind and origin ────────────────────────────────

#[test]
fn test_cli_missing_source() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.lz4");
    let out = run(&["decompress", s(&missing), s(&dir.path().join("out"))]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("FileNotFoundError"), "{}", stderr);
    assert!(stderr.contains("validate"), "{}", stderr);
}

#[test]
fn test_cli_wrong_extension() {
    let (dir, input) = make_temp_input();
    let out = run(&["decompress", s(&input), s(&dir.path().join("out"))]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("FormatError"));
}

#[test]
fn test_cli_corrupt_input_names_stage() {
    let dir = TempDir::new().unwrap();
    let bad = dir.path().join("bad.lz4");
    fs::write(&bad, b"this is definitely not a chunked file").unwrap();
    let out = run(&["-T2", "decompress", s(&bad), s(&dir.path().join("out"))]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("CodecError"), "{}", stderr);
    assert!(stderr.contains("reader"), "{}", stderr);
}
