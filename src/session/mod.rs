//! Remote session acquisition.
//!
//! A remotely hosted browser instance is reserved through an HTTP call to
//! the host's acquisition route; the returned session identifier then
//! scopes the devtools WebSocket connection.
//!
//! # Acquisition Flow
//!
//! 1. `GET {endpoint}/v1/acquire[?keep_alive=<ms>]`
//! 2. `200 {"sessionId": "<opaque-string>"}` on success
//! 3. `GET {endpoint}/v1/connectDevtools?browser_session=<sessionId>`
//!    with a WebSocket upgrade to open the debugging channel
//!
//! A caller that already holds a session identifier can skip step 1-2 by
//! supplying it via [`ConnectOptions::with_session_id`]; the transport
//! then joins the running instance directly.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `acquire` | HTTP acquisition handshake |
//! | `endpoint` | Endpoint URL validation and route construction |
//! | `options` | Connection options |

// ============================================================================
// Submodules
// ============================================================================

/// HTTP acquisition handshake.
pub mod acquire;

/// Endpoint URL validation and route construction.
pub mod endpoint;

/// Connection options.
pub mod options;

// ============================================================================
// Re-exports
// ============================================================================

pub use acquire::SessionAcquirer;
pub use endpoint::Endpoint;
pub use options::{ConnectOptions, DEFAULT_MAX_CHUNK_PAYLOAD};
