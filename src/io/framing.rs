//! Chunk framing for the chunked on-disk format.
//!
//! A chunked file is a plain concatenation of frames:
//!
//! ```text
//! frame  := header(8 bytes) payload(N bytes)
//! header := base64(big-endian u32 N)
//! ```
//!
//! The header is always 8 ASCII bytes whatever the value of N, so a reader
//! knows exactly how much to consume before it learns the payload length.
//! There is no trailing marker: end-of-stream is end-of-file at a frame
//! boundary.

use std::io::{self, Read, Write};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use thiserror::Error;

use crate::config::FRAME_HEADER_SIZE;

/// Errors raised while encoding or parsing frames.
#[derive(Debug, Error)]
pub enum FrameError {
    /// The 8 header bytes are not valid base64.
    #[error("invalid frame header {header:?}: {reason}")]
    InvalidHeader { header: String, reason: String },

    /// The header decoded to something other than 4 bytes.
    #[error("frame header decodes to {0} bytes, expected 4")]
    BadHeaderLength(usize),

    /// A payload does not fit the 32-bit length field.
    #[error("payload of {0} bytes exceeds the frame length limit")]
    PayloadTooLarge(usize),

    /// The stream ended inside a header or a payload.
    #[error("truncated frame: expected {expected} bytes, found {found}")]
    Truncated { expected: usize, found: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Encodes a payload length into its fixed-width frame header.
pub fn encode_header(len: u32) -> [u8; FRAME_HEADER_SIZE] {
    let text = STANDARD.encode(len.to_be_bytes());
    let mut header = [0u8; FRAME_HEADER_SIZE];
    // base64 of 4 bytes is always two full quanta: 6 symbols + "==".
    header.copy_from_slice(text.as_bytes());
    header
}

/// Decodes a frame header back into the payload length.
pub fn decode_header(header: &[u8; FRAME_HEADER_SIZE]) -> Result<u32, FrameError> {
    let raw = STANDARD
        .decode(header)
        .map_err(|e| FrameError::InvalidHeader {
            header: String::from_utf8_lossy(header).into_owned(),
            reason: e.to_string(),
        })?;
    let be: [u8; 4] = raw
        .as_slice()
        .try_into()
        .map_err(|_| FrameError::BadHeaderLength(raw.len()))?;
    Ok(u32::from_be_bytes(be))
}

/// Writes one frame (header + payload) and returns the bytes written.
pub fn write_frame<W: Write + ?Sized>(w: &mut W, payload: &[u8]) -> Result<u64, FrameError> {
    let len = u32::try_from(payload.len()).map_err(|_| FrameError::PayloadTooLarge(payload.len()))?;
    w.write_all(&encode_header(len))?;
    w.write_all(payload)?;
    Ok((FRAME_HEADER_SIZE + payload.len()) as u64)
}

// ---------------------------------------------------------------------------
// read_to_capacity: fills `buf` as fully as possible from `reader`.
//
// Retries on `Interrupted` and stops at EOF or when the buffer is full.
// Returns the number of bytes actually read.
// ---------------------------------------------------------------------------

pub(crate) fn read_to_capacity<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Reads frames one at a time from a chunked stream.
///
/// Yields each payload in file order and stops at a clean end-of-file
/// between frames. End-of-file inside a frame is [`FrameError::Truncated`].
pub struct FrameReader<R> {
    inner: R,
    bytes_read: u64,
    done: bool,
}

impl<R: Read> FrameReader<R> {
    pub fn new(inner: R) -> Self {
        FrameReader {
            inner,
            bytes_read: 0,
            done: false,
        }
    }

    /// Total bytes consumed so far, headers included.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Reads the next frame payload. `Ok(None)` at a clean end-of-file.
    pub fn next_frame(&mut self) -> Result<Option<Vec<u8>>, FrameError> {
        if self.done {
            return Ok(None);
        }
        let mut header = [0u8; FRAME_HEADER_SIZE];
        let got = read_to_capacity(&mut self.inner, &mut header)?;
        if got == 0 {
            self.done = true;
            return Ok(None);
        }
        self.bytes_read += got as u64;
        if got < FRAME_HEADER_SIZE {
            self.done = true;
            return Err(FrameError::Truncated {
                expected: FRAME_HEADER_SIZE,
                found: got,
            });
        }
        let len = decode_header(&header).inspect_err(|_| self.done = true)? as usize;

        // The length comes from the file; grow the buffer as bytes actually
        // arrive instead of trusting it for a single allocation.
        let mut payload = Vec::with_capacity(len.min(crate::config::BLOCK_SIZE_DEFAULT));
        let found = (&mut self.inner).take(len as u64).read_to_end(&mut payload)?;
        self.bytes_read += found as u64;
        if found < len {
            self.done = true;
            return Err(FrameError::Truncated {
                expected: len,
                found,
            });
        }
        Ok(Some(payload))
    }
}

impl<R: Read> Iterator for FrameReader<R> {
    type Item = Result<Vec<u8>, FrameError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
