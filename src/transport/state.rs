//! Connection state machine.
//!
//! A transport moves through `Connecting → Open → Closing → Closed` and
//! never transitions backwards; in particular there is no way out of
//! `Closed`. The state lives in a lock-free cell shared between the
//! transport handle and its event loop.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of a transport's connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Acquisition and upgrade handshake in progress.
    Connecting = 0,
    /// Connection established; messages flow and keepalive runs.
    Open = 1,
    /// Close requested; waiting for the close acknowledgment.
    Closing = 2,
    /// Connection torn down. Terminal.
    Closed = 3,
}

impl ConnectionState {
    /// Returns `true` while the connection accepts outbound messages.
    #[inline]
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closing => "closing",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}

// ============================================================================
// StateCell
// ============================================================================

/// Shared, monotonic state cell.
///
/// Transitions only move forward through the lifecycle; concurrent
/// attempts race through compare-and-swap so exactly one caller wins
/// each transition.
#[derive(Debug)]
pub(crate) struct StateCell(AtomicU8);

impl StateCell {
    /// Creates a cell in the `Connecting` state.
    pub(crate) fn new() -> Self {
        Self(AtomicU8::new(ConnectionState::Connecting as u8))
    }

    /// Returns the current state.
    pub(crate) fn current(&self) -> ConnectionState {
        decode(self.0.load(Ordering::Acquire))
    }

    /// Marks the handshake complete: `Connecting → Open`.
    pub(crate) fn set_open(&self) {
        let _ = self.0.compare_exchange(
            ConnectionState::Connecting as u8,
            ConnectionState::Open as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Begins teardown: `Connecting`/`Open` → `Closing`.
    ///
    /// Returns `false` if the transport is already closing or closed,
    /// which makes every close path idempotent.
    pub(crate) fn begin_close(&self) -> bool {
        let mut current = self.0.load(Ordering::Acquire);
        loop {
            if current >= ConnectionState::Closing as u8 {
                return false;
            }
            match self.0.compare_exchange(
                current,
                ConnectionState::Closing as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => current = actual,
            }
        }
    }

    /// Finalizes teardown: any state → `Closed`.
    pub(crate) fn set_closed(&self) {
        self.0.store(ConnectionState::Closed as u8, Ordering::Release);
    }
}

/// Decodes the stored discriminant.
fn decode(value: u8) -> ConnectionState {
    match value {
        0 => ConnectionState::Connecting,
        1 => ConnectionState::Open,
        2 => ConnectionState::Closing,
        _ => ConnectionState::Closed,
    }
}

// ============================================================================
// Tests
// ============================================================================
