//! Devtools Transport - Chunked remote-debugging transport.
//!
//! This library carries arbitrarily large JSON protocol messages to and
//! from a remotely hosted browser instance over a WebSocket whose
//! individual frames are size-limited, and manages the remote instance's
//! lifecycle: HTTP acquisition, keepalive, and idempotent teardown.
//!
//! # Architecture
//!
//! The transport sits between a protocol client and the remote host:
//!
//! - **Protocol client**: builds request objects, interprets responses
//!   and events, owns retry/reconnect policy
//! - **Transport**: one WebSocket bound to one session; splits outbound
//!   messages into size-bounded chunks and reassembles inbound ones
//! - **Remote host**: reserves browser instances via `/v1/acquire` and
//!   upgrades `/v1/connectDevtools` to the debugging channel
//!
//! Key design principles:
//!
//! - Each [`Transport`] owns: session + WebSocket connection + event loop
//! - All sends are serialized through a single writer, so chunks of two
//!   messages never interleave on the wire
//! - Acquisition and upgrade failures are fatal to [`Transport::create`];
//!   mid-session errors are reported, never retried
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use devtools_transport::{ConnectOptions, Endpoint, Result, Transport};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let endpoint = Endpoint::parse("https://browser.example.dev")?;
//!     let options = ConnectOptions::new().with_keep_alive(Duration::from_secs(60));
//!
//!     let transport = Transport::create(endpoint, options).await?;
//!     transport.on_message(|message| println!("<- {message}"));
//!
//!     transport
//!         .send(&serde_json::json!({
//!             "id": 1,
//!             "method": "Page.navigate",
//!             "params": {"url": "https://example.com"}
//!         }))
//!         .await?;
//!
//!     transport.close_and_wait().await;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`codec`] | Chunked message framing codec |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe session identifiers |
//! | [`session`] | Session acquisition and connection options |
//! | [`transport`] | Transport handle and event loop |

// ============================================================================
// Modules
// ============================================================================

/// Chunked message framing codec.
///
/// Splits messages into size-bounded binary chunks and reassembles the
/// inbound chunk stream.
pub mod codec;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers for remote browser sessions.
///
/// Newtype wrappers prevent mixing opaque session IDs with other strings.
pub mod identifiers;

/// Remote session acquisition.
///
/// HTTP handshake reserving a browser instance, plus connection options.
pub mod session;

/// WebSocket transport layer.
///
/// One connection per session: chunked send/receive, keepalive, close.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Codec types
pub use codec::{CHUNK_HEADER_LEN, Chunk, ChunkBuffer};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::SessionId;

// Session types
pub use session::{ConnectOptions, DEFAULT_MAX_CHUNK_PAYLOAD, Endpoint, SessionAcquirer};

// Transport types
pub use transport::{ConnectionState, Transport};
