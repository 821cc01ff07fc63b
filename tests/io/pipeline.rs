// Integration tests for src/io/pipeline.rs — the chunked three-stage pipeline
//
// Covers:
//   - round trip for lengths 0, 1, bs-1, bs, bs+1, k*bs and an arbitrary size
//   - frame count and sizes for empty, one-block and one-and-a-half-block sources
//   - queue capacity 1 vs 8 yields byte-identical compressed output
//   - several transform workers produce the same bytes as one
//   - decompression does not need the block size used at compression
//   - corrupt and truncated inputs fail with the right stage, keeping the
//     partially written target
//   - concurrent runs in one process do not interfere

use lz4pipe::io::chunk_codec::decompress_chunk;
use lz4pipe::io::framing::FrameReader;
use lz4pipe::io::{run_chunked, Mode, Prefs};
use lz4pipe::{Error, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

const BS: usize = 4096;

fn prefs(nb_workers: usize, transform_workers: usize) -> Prefs {
    let mut p = Prefs::default();
    p.set_nb_workers(nb_workers);
    p.set_transform_workers(transform_workers);
    p.set_block_size(BS);
    p.set_preserve_mtime(false);
    p
}

/// Compressible but not constant.
fn pattern_data(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i / 3) % 251) as u8).collect()
}

/// xorshift noise: LZ4 cannot shrink it.
fn noise(len: usize, mut seed: u64) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed as u8
        })
        .collect()
}

fn frames(path: &Path) -> Vec<Vec<u8>> {
    FrameReader::new(fs::File::open(path).unwrap())
        .collect::<Result<_, _>>()
        .unwrap()
}

fn round_trip(dir: &Path, data: &[u8], p: &Prefs) -> (PathBuf, Vec<u8>) {
    let src = dir.join("src.bin");
    let packed = dir.join("src.bin.lz4");
    let back = dir.join("back.bin");
    fs::write(&src, data).unwrap();
    run_chunked(&src, &packed, Mode::Compress, p).unwrap();
    run_chunked(&packed, &back, Mode::Decompress, p).unwrap();
    (packed, fs::read(&back).unwrap())
}

// ── Round trip ───────────────────────────────────────────────────────────────

#[test]
fn round_trip_boundary_lengths() {
    for len in [0, 1, BS - 1, BS, BS + 1, 5 * BS, 12_345] {
        let dir = TempDir::new().unwrap();
        let data = pattern_data(len);
        let (packed, back) = round_trip(dir.path(), &data, &prefs(4, 1));
        assert_eq!(back, data, "length {}", len);
        assert_eq!(frames(&packed).len(), len.div_ceil(BS), "length {}", len);
    }
}

#[test]
fn round_trip_incompressible_data() {
    let dir = TempDir::new().unwrap();
    let data = noise(7 * BS + 99, 0x9E37_79B9_7F4A_7C15);
    let (_, back) = round_trip(dir.path(), &data, &prefs(3, 2));
    assert_eq!(back, data);
}

// ── Concrete scenarios ───────────────────────────────────────────────────────

#[test]
fn empty_source_gives_zero_frames() {
    let dir = TempDir::new().unwrap();
    let (packed, back) = round_trip(dir.path(), &[], &prefs(2, 1));
    assert_eq!(fs::metadata(&packed).unwrap().len(), 0);
    assert!(back.is_empty());
}

#[test]
fn exactly_one_block_gives_one_frame() {
    let dir = TempDir::new().unwrap();
    let (packed, back) = round_trip(dir.path(), &pattern_data(BS), &prefs(2, 1));
    assert_eq!(frames(&packed).len(), 1);
    assert_eq!(back.len(), BS);
}

#[test]
fn block_and_a_half_gives_two_frames_second_shorter() {
    let dir = TempDir::new().unwrap();
    let data = noise(BS + BS / 2, 42);
    let (packed, back) = round_trip(dir.path(), &data, &prefs(2, 1));
    assert_eq!(back, data);

    let f = frames(&packed);
    assert_eq!(f.len(), 2);
    assert!(f[1].len() < f[0].len());
    assert_eq!(decompress_chunk(&f[0], BS).unwrap().len(), BS);
    assert_eq!(decompress_chunk(&f[1], BS).unwrap().len(), BS / 2);
}

#[test]
fn capacity_one_and_eight_agree() {
    let data = pattern_data(20 * BS + 17);

    let one = TempDir::new().unwrap();
    let eight = TempDir::new().unwrap();
    let (packed_1, back_1) = round_trip(one.path(), &data, &prefs(1, 1));
    let (packed_8, back_8) = round_trip(eight.path(), &data, &prefs(8, 1));

    assert_eq!(back_1, data);
    assert_eq!(back_8, data);
    assert_eq!(fs::read(packed_1).unwrap(), fs::read(packed_8).unwrap());
}

#[test]
fn transform_worker_count_does_not_change_output() {
    let data = pattern_data(33 * BS + 5);
    let single = TempDir::new().unwrap();
    let many = TempDir::new().unwrap();
    let (packed_1, _) = round_trip(single.path(), &data, &prefs(2, 1));
    let (packed_n, back_n) = round_trip(many.path(), &data, &prefs(2, 6));
    assert_eq!(back_n, data);
    assert_eq!(fs::read(packed_1).unwrap(), fs::read(packed_n).unwrap());
}

#[test]
fn large_blocks_decompress_with_default_prefs() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src.bin");
    let packed = dir.path().join("src.bin.lz4");
    let back = dir.path().join("back.bin");
    let data = pattern_data(3 << 20);
    fs::write(&src, &data).unwrap();

    let mut big = prefs(4, 1);
    big.set_block_size(2 << 20);
    run_chunked(&src, &packed, Mode::Compress, &big).unwrap();
    assert_eq!(frames(&packed).len(), 2);

    let mut defaults = Prefs::default();
    defaults.set_nb_workers(4);
    run_chunked(&packed, &back, Mode::Decompress, &defaults).unwrap();
    assert_eq!(fs::read(&back).unwrap(), data);
}

#[test]
fn decompression_ignores_a_smaller_block_size() {
    let dir = TempDir::new().unwrap();
    let data = pattern_data(5 * BS);
    let src = dir.path().join("src.bin");
    let packed = dir.path().join("src.bin.lz4");
    let back = dir.path().join("back.bin");
    fs::write(&src, &data).unwrap();

    let mut big = prefs(2, 1);
    big.set_block_size(4 * BS);
    run_chunked(&src, &packed, Mode::Compress, &big).unwrap();
    // The block size of the decompressing run plays no part.
    run_chunked(&packed, &back, Mode::Decompress, &prefs(2, 2)).unwrap();
    assert_eq!(fs::read(&back).unwrap(), data);
}

// ── Failures ─────────────────────────────────────────────────────────────────

#[test]
fn corrupt_chunk_fails_in_transform_and_keeps_partial_target() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src.bin");
    let packed = dir.path().join("src.bin.lz4");
    let back = dir.path().join("back.bin");
    let data = pattern_data(3 * BS);
    fs::write(&src, &data).unwrap();
    run_chunked(&src, &packed, Mode::Compress, &prefs(2, 1)).unwrap();

    // Replace the second frame's payload with garbage of the same length.
    let f = frames(&packed);
    let mut bytes = Vec::new();
    for (i, payload) in f.iter().enumerate() {
        let body = if i == 1 { vec![0xFF; payload.len()] } else { payload.clone() };
        lz4pipe::io::framing::write_frame(&mut bytes, &body).unwrap();
    }
    fs::write(&packed, bytes).unwrap();

    let err = run_chunked(&packed, &back, Mode::Decompress, &prefs(2, 1)).unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Transform, .. }), "{:?}", err);
    // The first chunk was already handed to the writer.
    assert_eq!(fs::read(&back).unwrap(), &data[..BS]);
}

#[test]
fn truncated_file_fails_in_reader() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src.bin");
    let packed = dir.path().join("src.bin.lz4");
    let back = dir.path().join("back.bin");
    fs::write(&src, noise(2 * BS, 7)).unwrap();
    run_chunked(&src, &packed, Mode::Compress, &prefs(2, 1)).unwrap();

    let mut bytes = fs::read(&packed).unwrap();
    bytes.truncate(bytes.len() - 10);
    fs::write(&packed, bytes).unwrap();

    let err = run_chunked(&packed, &back, Mode::Decompress, &prefs(2, 2)).unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Reader, .. }), "{:?}", err);
    assert!(back.exists());
}

#[test]
fn unwritable_target_fails_in_writer() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src.bin");
    fs::write(&src, pattern_data(10 * BS)).unwrap();
    let dst = dir.path().join("no/such/dir/out.lz4");

    let err = run_chunked(&src, &dst, Mode::Compress, &prefs(1, 1)).unwrap_err();
    assert!(matches!(err, Error::Io { stage: Stage::Writer, .. }), "{:?}", err);
}

// ── Isolation ────────────────────────────────────────────────────────────────

#[test]
fn concurrent_runs_are_isolated() {
    let dir = TempDir::new().unwrap();
    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let root = dir.path().join(format!("run{}", i));
            fs::create_dir(&root).unwrap();
            thread::spawn(move || {
                let data = noise(6 * BS + i as usize * 100, i + 1);
                let (_, back) = round_trip(&root, &data, &prefs(2, 2));
                assert_eq!(back, data);
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}
