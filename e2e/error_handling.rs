// e2e/error_handling.rs — failure behaviour through the public library API
//
// Verifies that every failure comes back as an error of the right kind and
// origin, that no run hangs, and what is left on disk afterwards:
//   - validation failures create nothing
//   - runtime failures keep the partially written target
//   - the two on-disk formats reject each other

use std::fs;
use std::path::Path;
use lz4pipe::io::framing::{write_frame, FrameReader};
use lz4pipe::{compress_file, decompress_file, ChunkedCodec, DirectCodec, Error, FileCodec, Prefs, Stage};
use tempfile::TempDir;

fn prefs(nb_workers: usize, transform_workers: usize) -> Prefs {
    let mut p = Prefs::default();
    p.set_nb_workers(nb_workers);
    p.set_transform_workers(transform_workers);
    p.set_block_size(2048);
    p
}

fn write(path: &Path, data: &[u8]) {
    fs::write(path, data).unwrap();
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn format_rejection_creates_no_target() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("notes.txt");
    let dst = dir.path().join("notes.out");
    write(&src, b"plain text");

    for n in [1, 2, 8] {
        let err = decompress_file(&src, &dst, &prefs(n, 1)).unwrap_err();
        assert!(matches!(err, Error::Format { .. }), "{:?}", err);
        assert!(!dst.exists());
    }
}

#[test]
fn directory_source_is_rejected() {
    let dir = TempDir::new().unwrap();
    let err = compress_file(dir.path(), &dir.path().join("x.lz4"), &prefs(2, 1)).unwrap_err();
    assert!(matches!(err, Error::Argument(_)), "{:?}", err);
}

#[test]
fn missing_source_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("gone.bin");
    let err = compress_file(&src, &dir.path().join("gone.lz4"), &prefs(4, 1)).unwrap_err();
    assert_eq!(err.kind_name(), "FileNotFoundError");
}

// ── Cross-format rejection ───────────────────────────────────────────────────

#[test]
fn direct_stream_fed_to_chunked_decompressor() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("data.bin");
    let packed = dir.path().join("data.bin.lz4");
    write(&src, &vec![5u8; 30_000]);

    DirectCodec::default().compress(&src, &packed).unwrap();
    for tw in [1, 4] {
        let err = ChunkedCodec::new(prefs(4, tw))
            .decompress(&packed, &dir.path().join("data.out"))
            .unwrap_err();
        assert!(matches!(err, Error::Codec { stage: Stage::Reader, .. }), "{:?}", err);
    }
}

// ── Runtime failures ─────────────────────────────────────────────────────────

#[test]
fn corrupt_middle_chunk_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("data.bin");
    let packed = dir.path().join("data.bin.lz4");
    let back = dir.path().join("data.out");
    let data: Vec<u8> = (0..10 * 2048).map(|i| (i % 97) as u8).collect();
    write(&src, &data);
    compress_file(&src, &packed, &prefs(2, 1)).unwrap();

    let frames: Vec<Vec<u8>> = FrameReader::new(fs::File::open(&packed).unwrap())
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(frames.len(), 10);
    let mut broken = Vec::new();
    for (i, f) in frames.iter().enumerate() {
        let body: &[u8] = if i == 4 { b"garbage" } else { f };
        write_frame(&mut broken, body).unwrap();
    }
    write(&packed, &broken);

    let err = decompress_file(&packed, &back, &prefs(2, 1)).unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Transform, .. }), "{:?}", err);
    let partial = fs::read(&back).unwrap();
    assert_eq!(partial, &data[..4 * 2048]);
}

#[test]
fn chunk_over_the_limit_is_rejected() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("big.bin");
    let packed = dir.path().join("big.bin.lz4");
    write(&src, &vec![1u8; 64 * 1024]);

    let mut big_blocks = prefs(2, 1);
    big_blocks.set_block_size(64 * 1024);
    compress_file(&src, &packed, &big_blocks).unwrap();

    let mut limited = prefs(2, 2);
    limited.set_chunk_limit(2048);
    let err = decompress_file(&packed, &dir.path().join("big.out"), &limited).unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Transform, .. }), "{:?}", err);
    assert!(err.to_string().contains("limit of 2048 bytes"), "{}", err);
}

#[test]
fn header_only_file_is_truncated() {
    let dir = TempDir::new().unwrap();
    let packed = dir.path().join("short.lz4");
    write(&packed, b"AAAAAQ==");
    let err = decompress_file(&packed, &dir.path().join("short.out"), &prefs(3, 1)).unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Reader, .. }), "{:?}", err);
}

#[test]
fn empty_frame_payload_decodes_to_nothing() {
    let dir = TempDir::new().unwrap();
    let packed = dir.path().join("empty-frame.lz4");
    let mut bytes = Vec::new();
    write_frame(&mut bytes, b"").unwrap();
    write(&packed, &bytes);

    let back = dir.path().join("empty-frame.out");
    let stats = decompress_file(&packed, &back, &prefs(2, 1)).unwrap();
    assert_eq!(stats.chunks, 1);
    assert!(fs::read(&back).unwrap().is_empty());
}
