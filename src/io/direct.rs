//! Single-threaded whole-stream codec.
//!
//! The source is copied through one LZ4 frame encoder (or decoder) straight
//! into the target: no chunking, no length headers, no queues. The result is
//! a plain LZ4 frame stream, which is NOT interchangeable with the chunked
//! format even though both use the `.lz4` extension.

use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use lz4_flex::frame::{FrameDecoder, FrameEncoder};
use tracing::debug;

use crate::error::{Error, Result, Stage};
use crate::io::file_io::{create_dst_file, open_src_file};
use crate::io::pipeline::RunStats;
use crate::util::get_file_size;

/// Maps a stream error to [`Error::Codec`] when the LZ4 frame layer raised
/// it, and to [`Error::Io`] otherwise.
fn classify(e: io::Error) -> Error {
    let from_codec = e
        .get_ref()
        .is_some_and(|inner| inner.is::<lz4_flex::frame::Error>());
    if from_codec {
        Error::codec(Stage::Direct, e.to_string())
    } else {
        Error::io(Stage::Direct, e)
    }
}

/// Compresses `src` into a single LZ4 frame stream at `dst`.
pub fn compress_stream(src: &Path, dst: &Path) -> Result<RunStats> {
    let mut input = BufReader::new(open_src_file(src, Stage::Direct)?);
    let output = BufWriter::new(create_dst_file(dst, Stage::Direct)?);

    let mut encoder = FrameEncoder::new(output);
    let bytes_read = io::copy(&mut input, &mut encoder).map_err(classify)?;
    let mut output = encoder
        .finish()
        .map_err(|e| Error::codec(Stage::Direct, e.to_string()))?;
    output.flush().map_err(|e| Error::io(Stage::Direct, e))?;
    drop(output);

    let stats = RunStats {
        bytes_read,
        bytes_written: get_file_size(dst),
        chunks: 0,
    };
    debug!(?stats, "direct compression finished");
    Ok(stats)
}

/// Decompresses the LZ4 frame stream at `src` into `dst`.
pub fn decompress_stream(src: &Path, dst: &Path) -> Result<RunStats> {
    let input = BufReader::new(open_src_file(src, Stage::Direct)?);
    let mut output = BufWriter::new(create_dst_file(dst, Stage::Direct)?);

    let mut decoder = FrameDecoder::new(input);
    let bytes_written = io::copy(&mut decoder, &mut output).map_err(classify)?;
    output.flush().map_err(|e| Error::io(Stage::Direct, e))?;

    let stats = RunStats {
        bytes_read: get_file_size(src),
        bytes_written,
        chunks: 0,
    };
    debug!(?stats, "direct decompression finished");
    Ok(stats)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
