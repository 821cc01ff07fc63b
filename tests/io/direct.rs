// Integration tests for src/io/direct.rs — single-threaded stream codec
//
// Covers:
//   - round trip including the empty file
//   - output is a standard LZ4 frame stream readable by lz4_flex directly
//   - a truncated stream is a codec error

use lz4pipe::io::direct::{compress_stream, decompress_stream};
use lz4pipe::{Error, Stage};
use std::fs;
use std::io::Read;
use tempfile::TempDir;

#[test]
fn empty_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("empty");
    let packed = dir.path().join("empty.lz4");
    let back = dir.path().join("empty.out");
    fs::write(&src, b"").unwrap();

    let c = compress_stream(&src, &packed).unwrap();
    assert_eq!(c.bytes_read, 0);
    assert!(c.bytes_written > 0, "frame header and end mark are always written");
    decompress_stream(&packed, &back).unwrap();
    assert!(fs::read(&back).unwrap().is_empty());
}

#[test]
fn output_is_a_plain_lz4_frame_stream() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("text");
    let packed = dir.path().join("text.lz4");
    let data = "plain frame stream, no length headers\n".repeat(3000);
    fs::write(&src, &data).unwrap();
    compress_stream(&src, &packed).unwrap();

    let mut decoded = String::new();
    lz4_flex::frame::FrameDecoder::new(fs::File::open(&packed).unwrap())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, data);
}

#[test]
fn truncated_stream_is_an_error() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("noise");
    let packed = dir.path().join("noise.lz4");
    let back = dir.path().join("noise.out");
    let data: Vec<u8> = (0..200_000u32).map(|i| (i.wrapping_mul(2_654_435_761) >> 13) as u8).collect();
    fs::write(&src, &data).unwrap();
    compress_stream(&src, &packed).unwrap();

    let mut bytes = fs::read(&packed).unwrap();
    bytes.truncate(bytes.len() / 2);
    fs::write(&packed, bytes).unwrap();

    let err = decompress_stream(&packed, &back).unwrap_err();
    assert_eq!(err.stage(), Stage::Direct);
    assert!(matches!(err, Error::Codec { .. } | Error::Io { .. }));
}
