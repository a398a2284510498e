//! Connection options.
//!
//! Options passed to [`Transport::create`](crate::Transport::create):
//! how long the remote instance should stay alive without activity,
//! whether to join an already-acquired session, and the chunk payload
//! bound for the framing codec.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use devtools_transport::ConnectOptions;
//!
//! let options = ConnectOptions::new()
//!     .with_keep_alive(Duration::from_secs(60))
//!     .with_session_id("abc123");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::num::NonZeroUsize;
use std::time::Duration;

use crate::codec::CHUNK_HEADER_LEN;
use crate::identifiers::SessionId;

// ============================================================================
// Constants
// ============================================================================

/// Default chunk payload bound: the remote host caps WebSocket frames at
/// 1 MiB, so payloads leave room for the chunk header.
pub const DEFAULT_MAX_CHUNK_PAYLOAD: NonZeroUsize =
    NonZeroUsize::new(1024 * 1024 - CHUNK_HEADER_LEN).unwrap();

// ============================================================================
// ConnectOptions
// ============================================================================

/// Options for acquiring and connecting to a remote browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// How long the remote instance stays alive without activity.
    ///
    /// Passed through to the acquisition route as `keep_alive`
    /// milliseconds. The remote host clamps it to its supported window
    /// (10s to 600s, default 60s); no local validation is applied.
    pub keep_alive: Option<Duration>,

    /// Join an already-acquired session instead of acquiring a new one.
    ///
    /// When set, no acquisition HTTP call is made.
    pub session_id: Option<SessionId>,

    /// Maximum chunk payload size for outbound framing.
    pub max_chunk_payload: NonZeroUsize,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ConnectOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            keep_alive: None,
            session_id: None,
            max_chunk_payload: DEFAULT_MAX_CHUNK_PAYLOAD,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ConnectOptions {
    /// Sets the remote keep-alive duration.
    #[inline]
    #[must_use]
    pub fn with_keep_alive(mut self, keep_alive: Duration) -> Self {
        self.keep_alive = Some(keep_alive);
        self
    }

    /// Reuses an already-acquired session.
    #[inline]
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<SessionId>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the maximum chunk payload size.
    #[inline]
    #[must_use]
    pub fn with_max_chunk_payload(mut self, max_chunk_payload: NonZeroUsize) -> Self {
        self.max_chunk_payload = max_chunk_payload;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConnectOptions::new();
        assert!(options.keep_alive.is_none());
        assert!(options.session_id.is_none());
        assert_eq!(options.max_chunk_payload, DEFAULT_MAX_CHUNK_PAYLOAD);
    }

    #[test]
    fn test_builder_methods() {
        let options = ConnectOptions::new()
            .with_keep_alive(Duration::from_secs(30))
            .with_session_id("abc123")
            .with_max_chunk_payload(NonZeroUsize::new(64).expect("positive"));

        assert_eq!(options.keep_alive, Some(Duration::from_secs(30)));
        assert_eq!(options.session_id, Some(SessionId::new("abc123")));
        assert_eq!(options.max_chunk_payload.get(), 64);
    }

    #[test]
    fn test_default_payload_leaves_header_room() {
        assert_eq!(
            DEFAULT_MAX_CHUNK_PAYLOAD.get() + CHUNK_HEADER_LEN,
            1024 * 1024
        );
    }
}
