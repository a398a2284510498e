//! Message splitting and reassembly.
//!
//! [`to_chunks`] turns one message into an ordered run of size-bounded
//! chunks; [`ChunkBuffer`] accumulates a session's inbound chunks and
//! yields complete messages as they become available. Consumed chunks are
//! evicted as part of reassembly, so the buffer never grows with the
//! number of messages received.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::error::{Error, Result};

use super::Chunk;

// ============================================================================
// Encoding
// ============================================================================

/// Splits a message into an ordered run of chunks.
///
/// Each chunk's payload holds at most `max_payload` bytes of the
/// message's UTF-8 encoding; concatenated in order the payloads reproduce
/// the message exactly. Exactly the last chunk in the run carries the
/// end-of-message flag, so the receiver can find the message boundary
/// from the chunk stream alone. An empty message yields a single final
/// chunk with an empty payload.
#[must_use]
pub fn to_chunks(message: &str, max_payload: NonZeroUsize) -> Vec<Chunk> {
    let bytes = message.as_bytes();
    if bytes.is_empty() {
        return vec![Chunk::new(0, true, Vec::new())];
    }

    let total = bytes.len().div_ceil(max_payload.get());
    bytes
        .chunks(max_payload.get())
        .enumerate()
        .map(|(index, payload)| Chunk::new(index as u32, index + 1 == total, payload.to_vec()))
        .collect()
}

// ============================================================================
// Reassembly
// ============================================================================

/// Scans an ordered chunk run for one complete message.
///
/// Looks for a contiguous index run `0..=n` from the start of `chunks`
/// whose last element carries the end-of-message flag. On success returns
/// the reassembled message bytes and the number of chunks consumed; the
/// caller must evict exactly that many chunks from the front of its
/// buffer. Returns `Ok(None)` while the run is still incomplete — partial
/// data is a normal state, not an error.
///
/// # Errors
///
/// Returns [`Error::Framing`] when the buffered run violates the index
/// sequence: a chunk out of order, a duplicated chunk, or a continuation
/// or final chunk with no matching start.
pub fn assemble(chunks: &[Chunk]) -> Result<Option<(Vec<u8>, usize)>> {
    let mut end = None;

    for (position, chunk) in chunks.iter().enumerate() {
        if chunk.index() as usize != position {
            return Err(Error::framing(format!(
                "chunk index {} at buffer position {position}",
                chunk.index()
            )));
        }
        if chunk.is_last() {
            end = Some(position);
            break;
        }
    }

    let Some(end) = end else {
        return Ok(None);
    };

    let size = chunks[..=end].iter().map(|c| c.payload().len()).sum();
    let mut message = Vec::with_capacity(size);
    for chunk in &chunks[..=end] {
        message.extend_from_slice(chunk.payload());
    }

    Ok(Some((message, end + 1)))
}

// ============================================================================
// ChunkBuffer
// ============================================================================

/// Inbound chunk buffer for one session.
///
/// Owned exclusively by a single transport's receive path. Chunks are
/// appended in arrival order; [`pop_message`](Self::pop_message) drains a
/// complete run as soon as one is available, so the buffer only ever
/// holds the fragments of the message currently in flight.
#[derive(Debug, Default)]
pub struct ChunkBuffer {
    chunks: VecDeque<Chunk>,
}

impl ChunkBuffer {
    /// Creates an empty buffer.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk in arrival order.
    #[inline]
    pub fn push(&mut self, chunk: Chunk) {
        self.chunks.push_back(chunk);
    }

    /// Returns the number of buffered chunks.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns `true` if no chunks are buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Discards all buffered chunks.
    ///
    /// Used to resynchronize at the next message start after a framing
    /// error.
    #[inline]
    pub fn clear(&mut self) {
        self.chunks.clear();
    }

    /// Takes one complete message off the front of the buffer.
    ///
    /// Returns the reassembled message bytes and evicts the consumed
    /// chunks, or `Ok(None)` if the buffered run is still incomplete.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Framing`] on an index-sequence violation; the
    /// buffer is left untouched so the caller decides how to resync.
    pub fn pop_message(&mut self) -> Result<Option<Vec<u8>>> {
        self.chunks.make_contiguous();
        let (front, _) = self.chunks.as_slices();

        match assemble(front)? {
            Some((message, consumed)) => {
                self.chunks.drain(..consumed);
                Ok(Some(message))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    fn max(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("positive chunk size")
    }

    #[test]
    fn test_single_chunk_message() {
        let chunks = to_chunks("hello", max(1024));
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_last());
        assert_eq!(chunks[0].payload(), b"hello");
    }

    #[test]
    fn test_split_into_bounded_chunks() {
        let chunks = to_chunks("abcdefghij", max(4));

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].payload(), b"abcd");
        assert_eq!(chunks[1].payload(), b"efgh");
        assert_eq!(chunks[2].payload(), b"ij");
        assert!(!chunks[0].is_last());
        assert!(!chunks[1].is_last());
        assert!(chunks[2].is_last());
    }

    #[test]
    fn test_empty_message() {
        let chunks = to_chunks("", max(16));
        assert_eq!(chunks.len(), 1);
        assert!(chunks[0].is_last());
        assert!(chunks[0].payload().is_empty());

        let mut buffer = ChunkBuffer::new();
        buffer.push(chunks[0].clone());
        let message = buffer.pop_message().expect("assemble").expect("complete");
        assert!(message.is_empty());
    }

    #[test]
    fn test_assemble_reports_consumed_count() {
        let chunks = to_chunks("abcdefghij", max(3));
        let (message, consumed) = assemble(&chunks).expect("assemble").expect("complete");

        assert_eq!(message, b"abcdefghij");
        assert_eq!(consumed, chunks.len());
    }

    #[test]
    fn test_incomplete_consumes_nothing() {
        let chunks = to_chunks("abcdefghij", max(4));
        let mut buffer = ChunkBuffer::new();
        buffer.push(chunks[0].clone());
        buffer.push(chunks[1].clone());

        assert!(buffer.pop_message().expect("no error").is_none());
        assert_eq!(buffer.len(), 2);

        buffer.push(chunks[2].clone());
        let message = buffer.pop_message().expect("assemble").expect("complete");
        assert_eq!(message, b"abcdefghij");
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_out_of_order_is_framing_error() {
        let chunks = to_chunks("abcdefghij", max(4));
        let mut buffer = ChunkBuffer::new();
        buffer.push(chunks[1].clone());
        buffer.push(chunks[0].clone());
        buffer.push(chunks[2].clone());

        let err = buffer.pop_message().unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_duplicated_chunk_is_framing_error() {
        let chunks = to_chunks("abcdefghij", max(4));
        let mut buffer = ChunkBuffer::new();
        buffer.push(chunks[0].clone());
        buffer.push(chunks[1].clone());
        buffer.push(chunks[1].clone());
        buffer.push(chunks[2].clone());

        let err = buffer.pop_message().unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_end_marker_without_start_is_framing_error() {
        let chunks = to_chunks("abcdefghij", max(4));
        let mut buffer = ChunkBuffer::new();
        // Final chunk arrives with no preceding start.
        buffer.push(chunks[2].clone());

        let err = buffer.pop_message().unwrap_err();
        assert!(err.is_framing());
    }

    #[test]
    fn test_two_messages_stay_separate() {
        let mut buffer = ChunkBuffer::new();
        for chunk in to_chunks("first message", max(4)) {
            buffer.push(chunk);
        }
        for chunk in to_chunks("second", max(4)) {
            buffer.push(chunk);
        }

        let first = buffer.pop_message().expect("assemble").expect("complete");
        assert_eq!(first, b"first message");

        let second = buffer.pop_message().expect("assemble").expect("complete");
        assert_eq!(second, b"second");

        assert!(buffer.pop_message().expect("no error").is_none());
    }

    #[test]
    fn test_multibyte_split_across_chunks() {
        // Each kana is 3 bytes; a 2-byte bound splits every codepoint.
        let message = "こんにちは";
        let chunks = to_chunks(message, max(2));
        assert!(chunks.len() > message.chars().count());

        let (bytes, _) = assemble(&chunks).expect("assemble").expect("complete");
        assert_eq!(String::from_utf8(bytes).expect("utf-8"), message);
    }

    #[test]
    fn test_wire_roundtrip() {
        let chunks = to_chunks("over the wire", max(5));
        let mut buffer = ChunkBuffer::new();
        for chunk in &chunks {
            let frame = chunk.to_bytes();
            buffer.push(Chunk::from_bytes(&frame).expect("parse"));
        }

        let message = buffer.pop_message().expect("assemble").expect("complete");
        assert_eq!(message, b"over the wire");
    }

    proptest! {
        #[test]
        fn prop_roundtrip(message in ".*", max_payload in 1usize..4096) {
            let bound = NonZeroUsize::new(max_payload).expect("positive");
            let chunks = to_chunks(&message, bound);

            let (bytes, consumed) = assemble(&chunks)
                .expect("assemble")
                .expect("complete");
            prop_assert_eq!(consumed, chunks.len());
            prop_assert_eq!(String::from_utf8(bytes).expect("utf-8"), message);
        }

        #[test]
        fn prop_payloads_bounded(message in ".*", max_payload in 1usize..4096) {
            let bound = NonZeroUsize::new(max_payload).expect("positive");
            for chunk in to_chunks(&message, bound) {
                prop_assert!(chunk.payload().len() <= max_payload);
            }
        }
    }
}
