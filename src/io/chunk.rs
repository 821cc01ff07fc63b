//! The unit of work passed between pipeline stages.

/// Sequence number carried by the end-of-stream sentinel.
pub const SENTINEL_SEQ: i64 = -1;

/// One sequence-numbered slice of file data.
///
/// Data chunks carry a non-negative sequence number and a payload. The
/// sentinel carries [`SENTINEL_SEQ`] and no payload; stages recognise it by
/// the missing payload, not by its number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub seq: i64,
    pub payload: Option<Vec<u8>>,
}

impl Chunk {
    /// Creates a data chunk.
    ///
    /// # Panics
    ///
    /// Panics if `seq` does not fit in an `i64`. A run would need more than
    /// `i64::MAX` chunks to get there.
    pub fn new(seq: u64, payload: Vec<u8>) -> Self {
        let seq = i64::try_from(seq).expect("chunk sequence number exceeds i64::MAX");
        Chunk {
            seq,
            payload: Some(payload),
        }
    }

    /// Creates the end-of-stream sentinel.
    pub fn sentinel() -> Self {
        Chunk {
            seq: SENTINEL_SEQ,
            payload: None,
        }
    }

    #[inline]
    pub fn is_sentinel(&self) -> bool {
        self.payload.is_none()
    }

    /// Returns a chunk with the same sequence number and a new payload.
    pub fn with_payload(&self, payload: Vec<u8>) -> Self {
        Chunk {
            seq: self.seq,
            payload: Some(payload),
        }
    }

    /// Sequence number as an unsigned index. `None` for the sentinel.
    pub fn index(&self) -> Option<u64> {
        if self.is_sentinel() {
            None
        } else {
            u64::try_from(self.seq).ok()
        }
    }

    /// Payload length in bytes (0 for the sentinel).
    pub fn len(&self) -> usize {
        self.payload.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
