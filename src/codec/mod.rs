//! Chunked message framing codec.
//!
//! Devtools protocol messages can be arbitrarily large, but the remote
//! host caps individual WebSocket frames. This module splits a message
//! into size-bounded binary chunks and reassembles the inbound chunk
//! stream back into complete messages.
//!
//! # Wire Format
//!
//! Each chunk is one binary WebSocket frame:
//!
//! ```text
//! ┌───────────────────┬───────────┬─────────────────────┐
//! │ index: u32 (BE)   │ flags: u8 │ payload: 0..=N bytes│
//! └───────────────────┴───────────┴─────────────────────┘
//! ```
//!
//! The index is the chunk's 0-based position within its message; flag bit
//! 0 marks the final chunk. Message boundaries are therefore recoverable
//! from the chunk stream alone, without external framing.
//!
//! The format is internal to this codec: it is opaque to any peer that is
//! not running the matching codec on the other end.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `chunk` | Chunk type and header encode/parse |
//! | `framing` | Message splitting and reassembly buffer |

// ============================================================================
// Submodules
// ============================================================================

/// Chunk type and header encode/parse.
pub mod chunk;

/// Message splitting and reassembly buffer.
pub mod framing;

// ============================================================================
// Re-exports
// ============================================================================

pub use chunk::{CHUNK_HEADER_LEN, Chunk};
pub use framing::{ChunkBuffer, assemble, to_chunks};
