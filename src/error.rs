//! Error types for the devtools transport.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use devtools_transport::{Transport, Result};
//!
//! async fn example(transport: &Transport) -> Result<()> {
//!     transport.send(&serde_json::json!({"id": 1, "method": "Browser.getVersion"})).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Acquisition | [`Error::Acquisition`], [`Error::InvalidEndpoint`] |
//! | Connection | [`Error::Upgrade`], [`Error::Transport`], [`Error::InvalidState`] |
//! | Codec | [`Error::Framing`], [`Error::ProtocolDecode`] |
//! | External | [`Error::Http`], [`Error::WebSocket`], [`Error::Json`] |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::transport::ConnectionState;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Acquisition Errors
    // ========================================================================
    /// Session acquisition failed.
    ///
    /// Returned when the acquisition endpoint answers with a non-success
    /// status, or with a success status but an unparsable body. The status
    /// code and response body are carried verbatim.
    #[error("Session acquisition failed: status {status}: {body}")]
    Acquisition {
        /// HTTP status code returned by the acquisition endpoint.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// Endpoint URL is invalid.
    ///
    /// Returned when the endpoint cannot be parsed or uses an unsupported
    /// scheme.
    #[error("Invalid endpoint: {message}")]
    InvalidEndpoint {
        /// Description of the problem with the endpoint.
        message: String,
    },

    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket upgrade handshake failed.
    ///
    /// Returned when the devtools connection upgrade does not succeed.
    /// The transport is never handed to the caller in this case.
    #[error("Upgrade failed: {message}")]
    Upgrade {
        /// Description of the handshake failure.
        message: String,
    },

    /// The underlying connection reported an error.
    ///
    /// Reported via the error observers mid-session. The connection is not
    /// assumed closed; the close event remains the teardown trigger.
    #[error("Transport error: {message}")]
    Transport {
        /// Description of the connection error.
        message: String,
    },

    /// Operation invoked in a state that does not permit it.
    ///
    /// Returned when an operation such as `send` is called on a transport
    /// that is already closing or closed.
    #[error("Cannot {operation}: transport is {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the transport was in.
        state: ConnectionState,
    },

    // ========================================================================
    // Codec Errors
    // ========================================================================
    /// Chunk sequence violates framing invariants.
    ///
    /// Returned when an inbound chunk stream cannot be reassembled, e.g. an
    /// end-of-message chunk with no matching start, a duplicated chunk, or
    /// chunks out of order. Partial data is not an error.
    #[error("Framing error: {message}")]
    Framing {
        /// Description of the framing violation.
        message: String,
    },

    /// Reassembled message bytes are not valid JSON text.
    ///
    /// Reported per message via the error observers; it never closes the
    /// connection or affects later messages.
    #[error("Protocol decode error: {message}")]
    ProtocolDecode {
        /// Description of the decode failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// HTTP request error during acquisition.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates an acquisition error.
    #[inline]
    pub fn acquisition(status: u16, body: impl Into<String>) -> Self {
        Self::Acquisition {
            status,
            body: body.into(),
        }
    }

    /// Creates an invalid endpoint error.
    #[inline]
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            message: message.into(),
        }
    }

    /// Creates an upgrade error.
    #[inline]
    pub fn upgrade(message: impl Into<String>) -> Self {
        Self::Upgrade {
            message: message.into(),
        }
    }

    /// Creates a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates an invalid state error.
    #[inline]
    pub fn invalid_state(operation: &'static str, state: ConnectionState) -> Self {
        Self::InvalidState { operation, state }
    }

    /// Creates a framing error.
    #[inline]
    pub fn framing(message: impl Into<String>) -> Self {
        Self::Framing {
            message: message.into(),
        }
    }

    /// Creates a protocol decode error.
    #[inline]
    pub fn protocol_decode(message: impl Into<String>) -> Self {
        Self::ProtocolDecode {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this error came from session acquisition.
    ///
    /// Covers both a non-success response and a failure to reach the
    /// acquisition endpoint at all.
    #[inline]
    #[must_use]
    pub fn is_acquisition(&self) -> bool {
        matches!(
            self,
            Self::Acquisition { .. } | Self::InvalidEndpoint { .. } | Self::Http(_)
        )
    }

    /// Returns `true` if this is an upgrade handshake error.
    #[inline]
    #[must_use]
    pub fn is_upgrade(&self) -> bool {
        matches!(self, Self::Upgrade { .. })
    }

    /// Returns `true` if this is a framing error.
    #[inline]
    #[must_use]
    pub fn is_framing(&self) -> bool {
        matches!(self, Self::Framing { .. })
    }

    /// Returns `true` if this is a per-message decode error.
    ///
    /// Decode errors are non-fatal: the connection stays open and later
    /// messages are unaffected.
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::ProtocolDecode { .. })
    }

    /// Returns `true` if this is a connection-level transport error.
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::WebSocket(_))
    }

    /// Returns `true` if this is a state error.
    #[inline]
    #[must_use]
    pub fn is_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Returns `true` if retrying the whole connection may succeed.
    ///
    /// The transport itself never retries; this is a hint for the protocol
    /// client that owns reconnection policy.
    #[inline]
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::WebSocket(_) | Self::Http(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquisition_error_display() {
        let err = Error::acquisition(503, "overloaded");
        assert_eq!(
            err.to_string(),
            "Session acquisition failed: status 503: overloaded"
        );
    }

    #[test]
    fn test_invalid_state_display() {
        let err = Error::invalid_state("send", ConnectionState::Closed);
        assert_eq!(err.to_string(), "Cannot send: transport is closed");
    }

    #[test]
    fn test_is_acquisition() {
        let acq_err = Error::acquisition(503, "overloaded");
        let endpoint_err = Error::invalid_endpoint("bad scheme");
        let other_err = Error::upgrade("refused");

        assert!(acq_err.is_acquisition());
        assert!(endpoint_err.is_acquisition());
        assert!(!other_err.is_acquisition());
    }

    #[test]
    fn test_is_framing() {
        let framing_err = Error::framing("end marker with no start");
        let decode_err = Error::protocol_decode("not valid JSON");

        assert!(framing_err.is_framing());
        assert!(!framing_err.is_decode());
        assert!(decode_err.is_decode());
        assert!(!decode_err.is_framing());
    }

    #[test]
    fn test_is_transport() {
        let transport_err = Error::transport("reset by peer");
        let state_err = Error::invalid_state("send", ConnectionState::Closing);

        assert!(transport_err.is_transport());
        assert!(transport_err.is_recoverable());
        assert!(state_err.is_state());
        assert!(!state_err.is_recoverable());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
