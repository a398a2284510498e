//! Transport handle and connection event loop.
//!
//! A [`Transport`] owns one WebSocket connection bound to one remote
//! browser session: it orchestrates acquisition, the upgrade handshake,
//! chunked send, chunked receive and reassembly, keepalive, and close.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Inbound frames (chunk reassembly, message dispatch)
//! - Outbound messages from the API (serialized through one writer)
//! - Keepalive ticks
//! - Close and error transitions
//!
//! All writes flow through the event loop, so chunks of two messages can
//! never interleave on the wire no matter how many tasks call
//! [`Transport::send`] concurrently.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, trace, warn};

use crate::codec::{Chunk, ChunkBuffer, to_chunks};
use crate::error::{Error, Result};
use crate::identifiers::SessionId;
use crate::session::{ConnectOptions, Endpoint, SessionAcquirer};

use super::observer::ObserverRegistry;
use super::state::{ConnectionState, StateCell};

// ============================================================================
// Constants
// ============================================================================

/// Interval between keepalive frames.
///
/// Short enough to defeat the remote host's idle-disconnect policy; no
/// response is expected or processed.
const KEEPALIVE_INTERVAL: Duration = Duration::from_secs(1);

/// Reserved text frame used for keepalive.
///
/// Peers running the chunk codec ignore it.
const KEEPALIVE_FRAME: &str = "ping";

// ============================================================================
// Types
// ============================================================================

/// Client-side WebSocket stream.
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Write half of the connection.
type WsSink = SplitSink<WsStream, Message>;

// ============================================================================
// TransportCommand
// ============================================================================

/// Internal commands for the event loop.
enum TransportCommand {
    /// Write one message's chunk frames, in order.
    Send {
        frames: Vec<Message>,
        ack: oneshot::Sender<Result<()>>,
    },
    /// Close the connection.
    Shutdown,
}

// ============================================================================
// Transport
// ============================================================================

/// Chunked transport to one remotely hosted browser session.
///
/// Created by [`Transport::create`], which acquires (or joins) a session
/// and upgrades the devtools WebSocket before handing back the handle —
/// a transport is never observable in a half-initialized state.
///
/// # Thread Safety
///
/// `Transport` is `Send + Sync` and cheap to clone; all clones drive the
/// same connection. Sends from any number of tasks are serialized
/// through the internal writer queue.
#[derive(Clone)]
pub struct Transport {
    /// Session this connection is bound to. Never changes.
    session_id: SessionId,
    /// Channel into the event loop.
    command_tx: mpsc::UnboundedSender<TransportCommand>,
    /// Registered observers (shared with event loop).
    observers: Arc<ObserverRegistry>,
    /// Connection state (shared with event loop).
    state: Arc<StateCell>,
    /// Signals `true` once the connection is fully torn down.
    closed_rx: watch::Receiver<bool>,
    /// Chunk payload bound for outbound framing.
    max_chunk_payload: NonZeroUsize,
}

impl Transport {
    /// Acquires a session and opens the devtools connection.
    ///
    /// Steps:
    ///
    /// 1. Reserve a browser instance via the acquisition route, or reuse
    ///    [`ConnectOptions::session_id`] without any network call.
    /// 2. Upgrade the session-scoped devtools route to a WebSocket.
    /// 3. Spawn the event loop and start keepalive.
    ///
    /// # Errors
    ///
    /// - [`Error::Acquisition`] / [`Error::Http`] if the instance cannot
    ///   be reserved (no retry is attempted)
    /// - [`Error::Upgrade`] if the WebSocket handshake fails
    pub async fn create(endpoint: Endpoint, options: ConnectOptions) -> Result<Self> {
        let acquirer = SessionAcquirer::new(endpoint.clone());
        let session_id = acquirer.acquire(&options).await?;

        let url = endpoint.devtools_url(&session_id);
        debug!(%session_id, url = %url, "upgrading devtools connection");

        let (ws_stream, _) = connect_async(url.as_str())
            .await
            .map_err(|e| Error::upgrade(e.to_string()))?;

        let state = Arc::new(StateCell::new());
        state.set_open();

        let observers = Arc::new(ObserverRegistry::new());
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (closed_tx, closed_rx) = watch::channel(false);

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&observers),
            Arc::clone(&state),
            closed_tx,
            session_id.clone(),
        ));

        info!(%session_id, "transport open");

        Ok(Self {
            session_id,
            command_tx,
            observers,
            state,
            closed_rx,
            max_chunk_payload: options.max_chunk_payload,
        })
    }

    /// Returns the session this transport is bound to.
    #[inline]
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the current connection state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state.current()
    }

    /// Registers an observer for decoded inbound messages.
    ///
    /// Every registered observer sees every message; registering does
    /// not displace previously registered observers.
    pub fn on_message(&self, observer: impl Fn(&Value) + Send + Sync + 'static) {
        self.observers.add_message_observer(Box::new(observer));
    }

    /// Registers an observer for connection teardown.
    ///
    /// Fires exactly once per transport, whichever close path wins.
    pub fn on_close(&self, observer: impl Fn() + Send + Sync + 'static) {
        self.observers.add_close_observer(Box::new(observer));
    }

    /// Registers an observer for non-fatal errors.
    ///
    /// Receives framing errors, per-message decode errors, and
    /// connection errors. None of these close the connection.
    pub fn on_error(&self, observer: impl Fn(&Error) + Send + Sync + 'static) {
        self.observers.add_error_observer(Box::new(observer));
    }

    /// Sends one protocol message.
    ///
    /// The message is serialized to JSON, split into chunks, and written
    /// to the wire in generation order by the event loop's single
    /// writer. The call resolves once every chunk has been written;
    /// correlating an eventual response is the protocol client's job.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if the transport is closing or closed
    /// - [`Error::Json`] if the message cannot be serialized
    /// - [`Error::WebSocket`] if a chunk write fails
    pub async fn send<T: Serialize>(&self, message: &T) -> Result<()> {
        let state = self.state.current();
        if !state.is_open() {
            return Err(Error::invalid_state("send", state));
        }

        let text = serde_json::to_string(message)?;
        let frames: Vec<Message> = to_chunks(&text, self.max_chunk_payload)
            .iter()
            .map(|chunk| Message::Binary(chunk.to_bytes().into()))
            .collect();

        trace!(
            session_id = %self.session_id,
            bytes = text.len(),
            chunks = frames.len(),
            "sending message"
        );

        let (ack_tx, ack_rx) = oneshot::channel();
        self.command_tx
            .send(TransportCommand::Send {
                frames,
                ack: ack_tx,
            })
            .map_err(|_| Error::invalid_state("send", ConnectionState::Closed))?;

        ack_rx
            .await
            .map_err(|_| Error::transport("connection closed before message was written"))?
    }

    /// Closes the connection.
    ///
    /// Stops keepalive, asks the event loop to close the socket, and
    /// fires close observers. Idempotent: calling close on an already
    /// closing or closed transport is a no-op and never re-fires
    /// observers.
    pub fn close(&self) {
        if !self.state.begin_close() {
            trace!(session_id = %self.session_id, "close ignored: already closing or closed");
            return;
        }

        debug!(session_id = %self.session_id, "closing transport");
        let _ = self.command_tx.send(TransportCommand::Shutdown);
        self.observers.notify_close();
    }

    /// Closes the connection and waits for the close acknowledgment.
    ///
    /// Returns immediately if already closed; otherwise suspends until
    /// the event loop has observed the socket teardown, guaranteeing the
    /// remote resource teardown has been seen before the caller
    /// proceeds.
    pub async fn close_and_wait(&self) {
        if self.state.current() == ConnectionState::Closed {
            return;
        }

        self.close();

        let mut closed_rx = self.closed_rx.clone();
        // The event loop always publishes `true` before dropping the
        // sender, so an Err here still means the loop has exited.
        let _ = closed_rx.wait_for(|closed| *closed).await;
    }

    // ========================================================================
    // Event Loop
    // ========================================================================

    /// Event loop handling WebSocket I/O, keepalive, and teardown.
    async fn run_event_loop(
        ws_stream: WsStream,
        mut command_rx: mpsc::UnboundedReceiver<TransportCommand>,
        observers: Arc<ObserverRegistry>,
        state: Arc<StateCell>,
        closed_tx: watch::Sender<bool>,
        session_id: SessionId,
    ) {
        let (mut ws_write, mut ws_read) = ws_stream.split();
        let mut buffer = ChunkBuffer::new();

        let mut keepalive = interval_at(Instant::now() + KEEPALIVE_INTERVAL, KEEPALIVE_INTERVAL);
        keepalive.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Disabled on the first connection error; the loop itself keeps
        // draining until the close event, which is the sole teardown
        // trigger.
        let mut keepalive_active = true;

        loop {
            tokio::select! {
                frame = ws_read.next() => {
                    match frame {
                        Some(Ok(Message::Binary(data))) => {
                            Self::handle_inbound_frame(&data, &mut buffer, &observers);
                        }

                        Some(Ok(Message::Text(text))) => {
                            if text.as_str() == KEEPALIVE_FRAME {
                                trace!(%session_id, "keepalive frame received");
                            } else {
                                trace!(%session_id, "ignoring unexpected text frame");
                            }
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!(%session_id, "close frame received");
                            break;
                        }

                        // Ping/Pong and raw frames carry no chunks.
                        Some(Ok(_)) => {}

                        Some(Err(e)) => {
                            warn!(%session_id, error = %e, "websocket error");
                            keepalive_active = false;
                            observers.notify_error(&Error::from(e));
                        }

                        None => {
                            debug!(%session_id, "websocket stream ended");
                            break;
                        }
                    }
                }

                command = command_rx.recv() => {
                    match command {
                        Some(TransportCommand::Send { frames, ack }) => {
                            let result = Self::write_frames(&mut ws_write, frames).await;
                            let _ = ack.send(result);
                        }

                        Some(TransportCommand::Shutdown) => {
                            debug!(%session_id, "shutdown command received");
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!(%session_id, "all transport handles dropped");
                            let _ = ws_write.close().await;
                            break;
                        }
                    }
                }

                _ = keepalive.tick(), if keepalive_active => {
                    if let Err(e) = ws_write.send(Message::Text(KEEPALIVE_FRAME.into())).await {
                        warn!(%session_id, error = %e, "keepalive send failed");
                        keepalive_active = false;
                        observers.notify_error(&Error::from(e));
                    }
                }
            }
        }

        state.set_closed();
        let _ = closed_tx.send(true);
        observers.notify_close();

        debug!(%session_id, "event loop terminated");
    }

    /// Handles one inbound binary frame.
    ///
    /// Framing errors clear the session buffer to resynchronize at the
    /// next message start; decode errors drop only the affected message.
    /// Neither closes the connection.
    fn handle_inbound_frame(data: &[u8], buffer: &mut ChunkBuffer, observers: &ObserverRegistry) {
        let chunk = match Chunk::from_bytes(data) {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, "malformed chunk frame");
                observers.notify_error(&e);
                return;
            }
        };

        buffer.push(chunk);

        loop {
            match buffer.pop_message() {
                Ok(Some(bytes)) => Self::dispatch_message(bytes, observers),
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, buffered = buffer.len(), "dropping chunk buffer");
                    buffer.clear();
                    observers.notify_error(&e);
                    break;
                }
            }
        }
    }

    /// Parses reassembled bytes and delivers the message.
    fn dispatch_message(bytes: Vec<u8>, observers: &ObserverRegistry) {
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                let error = Error::protocol_decode(format!("message is not UTF-8: {e}"));
                warn!(error = %error, "dropping undecodable message");
                observers.notify_error(&error);
                return;
            }
        };

        match serde_json::from_str::<Value>(&text) {
            Ok(message) => observers.notify_message(&message),
            Err(e) => {
                let error = Error::protocol_decode(format!("message is not JSON: {e}"));
                warn!(error = %error, "dropping undecodable message");
                observers.notify_error(&error);
            }
        }
    }

    /// Writes one message's chunk frames in order.
    async fn write_frames(ws_write: &mut WsSink, frames: Vec<Message>) -> Result<()> {
        for frame in frames {
            ws_write.send(frame).await?;
        }
        Ok(())
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.session_id, f)
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("session_id", &self.session_id)
            .field("max_chunk_payload", &self.max_chunk_payload)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
