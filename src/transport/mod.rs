//! WebSocket transport layer.
//!
//! This module owns the connection to the remote browser host: one
//! [`Transport`] per session, with chunked framing on the wire.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                               ┌─────────────────┐
//! │ Protocol client  │        WebSocket (wss)        │  Remote browser │
//! │                  │◄─────────────────────────────►│  host           │
//! │  Transport       │   size-bounded binary chunks  │                 │
//! │  → event loop    │   + "ping" keepalive frames   │  session <id>   │
//! └──────────────────┘                               └─────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. `Transport::create` - Acquire (or join) a session, upgrade the
//!    devtools WebSocket
//! 2. `Transport::send` / observers - Exchange chunked protocol messages
//! 3. `Transport::close` / `close_and_wait` - Tear down the connection
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | Transport handle and connection event loop |
//! | `observer` | Observer registration and dispatch |
//! | `state` | Connection state machine |

// ============================================================================
// Submodules
// ============================================================================

/// Transport handle and connection event loop.
pub mod connection;

/// Observer registration and dispatch.
pub mod observer;

/// Connection state machine.
pub mod state;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::Transport;
pub use observer::{CloseObserver, ErrorObserver, MessageObserver};
pub use state::ConnectionState;
