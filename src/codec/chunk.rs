//! Chunk type and binary header format.
//!
//! A chunk is one size-bounded fragment of a framed message. The 5-byte
//! header carries the chunk's position within its message and a flag
//! marking the end of the message.

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Size of the chunk header in bytes (u32 index + u8 flags).
pub const CHUNK_HEADER_LEN: usize = 5;

/// Flag bit marking the final chunk of a message.
const FLAG_FINAL: u8 = 0b0000_0001;

/// All flag bits this codec version understands.
const FLAG_MASK: u8 = FLAG_FINAL;

// ============================================================================
// Chunk
// ============================================================================

/// One size-bounded binary fragment of a framed message.
///
/// Chunks are produced in order by [`to_chunks`](super::to_chunks) and
/// consumed in arrival order by [`ChunkBuffer`](super::ChunkBuffer). The
/// payload concatenation of a message's chunks, in index order,
/// reproduces the message's UTF-8 bytes exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 0-based position of this chunk within its message.
    index: u32,
    /// Whether this is the final chunk of its message.
    last: bool,
    /// Fragment of the message's UTF-8 bytes.
    payload: Vec<u8>,
}

impl Chunk {
    /// Creates a chunk.
    #[inline]
    #[must_use]
    pub fn new(index: u32, last: bool, payload: Vec<u8>) -> Self {
        Self {
            index,
            last,
            payload,
        }
    }

    /// Returns the chunk's position within its message.
    #[inline]
    #[must_use]
    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Returns `true` if this chunk ends its message.
    #[inline]
    #[must_use]
    pub const fn is_last(&self) -> bool {
        self.last
    }

    /// Returns the chunk payload.
    #[inline]
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Serializes the chunk into one binary wire frame.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut frame = Vec::with_capacity(CHUNK_HEADER_LEN + self.payload.len());
        frame.extend_from_slice(&self.index.to_be_bytes());
        frame.push(if self.last { FLAG_FINAL } else { 0 });
        frame.extend_from_slice(&self.payload);
        frame
    }

    /// Parses a chunk from one binary wire frame.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] if the frame is shorter than the header
    /// or carries flag bits this codec does not understand.
    pub fn from_bytes(frame: &[u8]) -> Result<Self> {
        if frame.len() < CHUNK_HEADER_LEN {
            return Err(Error::framing(format!(
                "chunk frame too short: {} bytes, header needs {CHUNK_HEADER_LEN}",
                frame.len()
            )));
        }

        let index = u32::from_be_bytes([frame[0], frame[1], frame[2], frame[3]]);
        let flags = frame[4];

        if flags & !FLAG_MASK != 0 {
            return Err(Error::framing(format!(
                "unknown chunk flags: {flags:#04x}"
            )));
        }

        Ok(Self {
            index,
            last: flags & FLAG_FINAL != 0,
            payload: frame[CHUNK_HEADER_LEN..].to_vec(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
