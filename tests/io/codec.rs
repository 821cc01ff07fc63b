// Integration tests for src/codec.rs — codec selection and file operations
//
// Covers:
//   - codec_for picks direct for one worker, chunked otherwise
//   - validation errors come back before any target is created
//   - the two formats are not interchangeable
//   - run statistics

use lz4pipe::{codec_for, compress_file, decompress_file, ChunkedCodec, DirectCodec, Error, FileCodec, Prefs, Stage};
use std::fs;
use tempfile::TempDir;

fn prefs(nb_workers: usize) -> Prefs {
    let mut p = Prefs::default();
    p.set_nb_workers(nb_workers);
    p.set_block_size(8 * 1024);
    p
}

#[test]
fn codec_names() {
    assert_eq!(codec_for(&prefs(1)).name(), "direct");
    assert_eq!(codec_for(&prefs(2)).name(), "chunked");
}

#[test]
fn missing_source_is_not_found_for_both_codecs() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("absent.lz4");
    let dst = dir.path().join("out");
    for n in [1, 4] {
        let err = decompress_file(&src, &dst, &prefs(n)).unwrap_err();
        assert!(matches!(err, Error::FileNotFound(ref p) if *p == src), "{:?}", err);
        assert_eq!(err.stage(), Stage::Validate);
        assert!(!dst.exists());
    }
}

#[test]
fn wrong_extension_is_a_format_error() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("archive.zip");
    fs::write(&src, b"PK").unwrap();
    let err = decompress_file(&src, &dir.path().join("out"), &prefs(4)).unwrap_err();
    assert!(matches!(err, Error::Format { expected: ".lz4", .. }));
    assert_eq!(err.kind_name(), "FormatError");
}

#[test]
fn blank_target_is_an_argument_error() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in");
    fs::write(&src, b"x").unwrap();
    let err = compress_file(&src, std::path::Path::new(""), &prefs(2)).unwrap_err();
    assert!(matches!(err, Error::Argument(_)));
}

#[test]
fn chunked_output_is_rejected_by_direct_decompressor() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.bin");
    let packed = dir.path().join("in.bin.lz4");
    fs::write(&src, vec![9u8; 50_000]).unwrap();

    ChunkedCodec::new(prefs(4)).compress(&src, &packed).unwrap();
    let err = DirectCodec::default()
        .decompress(&packed, &dir.path().join("out"))
        .unwrap_err();
    assert!(matches!(err, Error::Codec { stage: Stage::Direct, .. }), "{:?}", err);
}

#[test]
fn stats_describe_the_run() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.bin");
    let packed = dir.path().join("in.bin.lz4");
    let back = dir.path().join("back.bin");
    fs::write(&src, vec![1u8; 20 * 1024]).unwrap();

    let c = compress_file(&src, &packed, &prefs(3)).unwrap();
    assert_eq!(c.bytes_read, 20 * 1024);
    assert_eq!(c.chunks, 3);
    assert_eq!(c.bytes_written, fs::metadata(&packed).unwrap().len());
    assert!(c.ratio_percent() < 100.0);

    let d = decompress_file(&packed, &back, &prefs(3)).unwrap();
    assert_eq!(d.bytes_read, c.bytes_written);
    assert_eq!(d.bytes_written, 20 * 1024);
    assert_eq!(d.chunks, 3);
}
