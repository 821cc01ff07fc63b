// e2e/roundtrip.rs — end-to-end round trips through the public library API
//
// Exercises compress_file / decompress_file with realistic inputs across
// worker counts, transform-worker counts and block sizes, checking the
// restored file byte for byte.

use std::fs;
use std::path::Path;
use lz4pipe::{compress_file, decompress_file, Prefs};
use tempfile::TempDir;

/// Text-like data: repetitive words with varying line lengths.
fn corpus(len: usize) -> Vec<u8> {
    const WORDS: [&str; 8] = ["alpha ", "beta ", "gamma ", "delta\n", "pipeline ", "chunk ", "frame ", "order\n"];
    let mut out = Vec::with_capacity(len + 16);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(WORDS[(i * 7 + i / 3) % WORDS.len()].as_bytes());
        i += 1;
    }
    out.truncate(len);
    out
}

fn prefs(nb_workers: usize, transform_workers: usize, block_size: usize) -> Prefs {
    let mut p = Prefs::default();
    p.set_nb_workers(nb_workers);
    p.set_transform_workers(transform_workers);
    p.set_block_size(block_size);
    p
}

fn check(dir: &Path, name: &str, data: &[u8], p: &Prefs) {
    let src = dir.join(name);
    let packed = dir.join(format!("{}.lz4", name));
    let back = dir.join(format!("{}.out", name));
    fs::write(&src, data).unwrap();

    compress_file(&src, &packed, p).unwrap();
    decompress_file(&packed, &back, p).unwrap();
    assert_eq!(fs::read(&back).unwrap(), data, "{} with {:?}", name, p);
}

// ── 1. Worker matrix ─────────────────────────────────────────────────────────

#[test]
fn worker_matrix_round_trips() {
    let dir = TempDir::new().unwrap();
    let data = corpus(300_000);
    for (i, (nb, tw)) in [(1, 1), (2, 1), (4, 1), (4, 3), (8, 8)].into_iter().enumerate() {
        check(dir.path(), &format!("matrix{}", i), &data, &prefs(nb, tw, 16 * 1024));
    }
}

// ── 2. Block sizes ───────────────────────────────────────────────────────────

#[test]
fn odd_block_sizes_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = corpus(100_003);
    for bs in [1, 7, 1000, 65_536, 1 << 20] {
        check(dir.path(), &format!("bs{}", bs), &data[..data.len().min(bs * 50 + 3)], &prefs(3, 2, bs));
    }
}

// ── 3. Default configuration, multi-megabyte input ───────────────────────────

#[test]
fn default_prefs_multi_block_file() {
    let dir = TempDir::new().unwrap();
    let data = corpus(3 * (1 << 20) + 12_345);
    let mut p = Prefs::default();
    p.set_nb_workers(4);
    check(dir.path(), "big.txt", &data, &p);
}

// ── 4. Binary content with every byte value ──────────────────────────────────

#[test]
fn all_byte_values_survive() {
    let dir = TempDir::new().unwrap();
    let data: Vec<u8> = (0..=255u8).cycle().take(70_000).collect();
    check(dir.path(), "bytes.bin", &data, &prefs(2, 1, 4096));
    check(dir.path(), "bytes-direct.bin", &data, &prefs(1, 1, 4096));
}
