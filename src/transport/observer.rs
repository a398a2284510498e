//! Observer registration and dispatch.
//!
//! Decoded messages, close, and error events are delivered through
//! registered observers rather than single assignable callback slots, so
//! independent consumers (the protocol client, logging, metrics) can all
//! watch the same transport without overwriting each other.
//!
//! Close observers fire exactly once per transport, regardless of which
//! close path wins (explicit close, remote close, or handle drop).

// ============================================================================
// Imports
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::error::Error;

// ============================================================================
// Types
// ============================================================================

/// Observer invoked with each decoded inbound message.
pub type MessageObserver = Box<dyn Fn(&Value) + Send + Sync>;

/// Observer invoked once when the connection is torn down.
pub type CloseObserver = Box<dyn Fn() + Send + Sync>;

/// Observer invoked with non-fatal transport, framing, and decode errors.
pub type ErrorObserver = Box<dyn Fn(&Error) + Send + Sync>;

// ============================================================================
// ObserverRegistry
// ============================================================================

/// Registered observers for one transport.
///
/// Observers run on the event-loop task and must not block; an observer
/// must not register further observers from within its callback.
#[derive(Default)]
pub(crate) struct ObserverRegistry {
    /// Message observers, called in registration order.
    message: Mutex<Vec<MessageObserver>>,
    /// Close observers, called in registration order.
    close: Mutex<Vec<CloseObserver>>,
    /// Error observers, called in registration order.
    error: Mutex<Vec<ErrorObserver>>,
    /// Whether close observers have already fired.
    close_fired: AtomicBool,
}

impl ObserverRegistry {
    /// Creates an empty registry.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Registers a message observer.
    pub(crate) fn add_message_observer(&self, observer: MessageObserver) {
        self.message.lock().push(observer);
    }

    /// Registers a close observer.
    pub(crate) fn add_close_observer(&self, observer: CloseObserver) {
        self.close.lock().push(observer);
    }

    /// Registers an error observer.
    pub(crate) fn add_error_observer(&self, observer: ErrorObserver) {
        self.error.lock().push(observer);
    }

    /// Delivers a decoded message to all message observers.
    pub(crate) fn notify_message(&self, message: &Value) {
        for observer in self.message.lock().iter() {
            observer(message);
        }
    }

    /// Fires close observers.
    ///
    /// Only the first call delivers; later calls from other close paths
    /// are no-ops.
    pub(crate) fn notify_close(&self) {
        if self.close_fired.swap(true, Ordering::SeqCst) {
            return;
        }
        for observer in self.close.lock().iter() {
            observer();
        }
    }

    /// Delivers a non-fatal error to all error observers.
    pub(crate) fn notify_error(&self, error: &Error) {
        for observer in self.error.lock().iter() {
            observer(error);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
