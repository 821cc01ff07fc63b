//! Per-chunk LZ4 compression.
//!
//! Every chunk is compressed into its own complete LZ4 frame, never as a
//! continuation of the previous chunk, so each frame on disk can be
//! decompressed without reference to any other.

use std::io::{Read, Write};

use lz4_flex::frame::{FrameDecoder, FrameEncoder};

/// Compresses `data` into one self-contained LZ4 frame.
pub fn compress_chunk(data: &[u8]) -> Result<Vec<u8>, String> {
    // Compressible input shrinks; incompressible input grows by a few bytes
    // of frame overhead per block.
    let mut enc = FrameEncoder::new(Vec::with_capacity(data.len() / 2 + 64));
    enc.write_all(data)
        .map_err(|e| format!("compression failed: {}", e))?;
    enc.finish()
        .map_err(|e| format!("compression failed: {}", e))
}

/// Decompresses one LZ4 frame, refusing to produce more than `limit` bytes.
///
/// The returned buffer holds exactly the bytes produced.
pub fn decompress_chunk(data: &[u8], limit: usize) -> Result<Vec<u8>, String> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = Vec::with_capacity(limit.min(data.len().saturating_mul(4)));
    // One byte past the limit is enough to tell "exactly full" from "overflow".
    FrameDecoder::new(data)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|e| format!("decompression failed: {}", e))?;
    if out.len() > limit {
        return Err(format!(
            "decompressed chunk exceeds the limit of {} bytes",
            limit
        ));
    }
    out.shrink_to_fit();
    Ok(out)
}
