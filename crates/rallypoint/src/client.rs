//! `ChatClient` builder, connection manager, and send path.
//!
//! This is the consumer-facing surface. It owns the one socket, starts and
//! stops the per-connection tasks, and bridges their output to the
//! consumer's tick through the dispatcher.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use rallypoint_protocol::{ChatMessage, CodecKind, FrameCodec};
use rallypoint_session::Session;
use rallypoint_transport::{ConnectRequest, ConnectionId, Connector, WebSocketConnector};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dispatch::{Dispatcher, Inbox};
use crate::receive::{receive_loop, write_loop, Outbound, ReceiveContext};
use crate::state::{transition, ConnectionState};
use crate::RallypointError;

/// Counter for generating unique connection IDs.
static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Chat dialect spoken by the server.
    pub codec: CodecKind,
}

/// Builder for a [`ChatClient`].
///
/// # Example
///
/// ```rust
/// use rallypoint::prelude::*;
///
/// let session = Session::new("alice", "jwt").unwrap();
/// let client = ChatClient::builder()
///     .codec(CodecKind::RawText)
///     .build(session);
/// assert!(!client.is_connected());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChatClientBuilder {
    config: ClientConfig,
}

impl ChatClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Selects the chat dialect.
    pub fn codec(mut self, codec: CodecKind) -> Self {
        self.config.codec = codec;
        self
    }

    /// Builds a client that connects over WebSocket.
    pub fn build(self, session: Session) -> ChatClient<WebSocketConnector> {
        self.build_with(WebSocketConnector, session)
    }

    /// Builds a client on top of any [`Connector`].
    pub fn build_with<C: Connector>(self, connector: C, session: Session) -> ChatClient<C> {
        let (inbox, dispatcher) = Dispatcher::new();
        let (state, _) = watch::channel(ConnectionState::Closed);
        ChatClient {
            connector,
            session,
            codec: self.config.codec.build(),
            state: Arc::new(state),
            link: None,
            inbox,
            dispatcher,
        }
    }
}

// ---------------------------------------------------------------------------
// Link — one live connection
// ---------------------------------------------------------------------------

/// Handle to an established connection and its two tasks.
///
/// The socket halves live inside the tasks, never here, so a connection the
/// receive loop has given up on is released without waiting for the
/// consumer to call `disconnect`.
struct Link {
    id: ConnectionId,
    cancel: CancellationToken,
    enabled: Arc<AtomicBool>,
    outbound: mpsc::UnboundedSender<Outbound>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Puts the state back to `Closed` if a connect attempt is abandoned
/// mid-handshake (its future dropped).
struct ConnectingGuard {
    state: Arc<watch::Sender<ConnectionState>>,
    armed: bool,
}

impl Drop for ConnectingGuard {
    fn drop(&mut self) {
        if self.armed {
            transition(&self.state, ConnectionState::Closed);
        }
    }
}

// ---------------------------------------------------------------------------
// ChatClient
// ---------------------------------------------------------------------------

/// A realtime chat and matchmaking client over one persistent connection.
///
/// Methods that change the connection take `&mut self` and are meant to be
/// called from the consumer's own task or thread. Sends take `&self` and
/// never wait for the network. Incoming frames are buffered by a background
/// task until [`drain`](Self::drain) is called on the consumer's tick.
///
/// No operation panics or retries on network failure; failures are logged
/// and resolve to [`ConnectionState::Closed`] or to a dropped frame.
pub struct ChatClient<C: Connector = WebSocketConnector> {
    connector: C,
    session: Session,
    codec: Arc<dyn FrameCodec>,
    state: Arc<watch::Sender<ConnectionState>>,
    link: Option<Link>,
    inbox: Inbox,
    dispatcher: Dispatcher,
}

impl ChatClient<WebSocketConnector> {
    /// Creates a new builder.
    pub fn builder() -> ChatClientBuilder {
        ChatClientBuilder::new()
    }
}

impl<C: Connector> ChatClient<C> {
    // -- Connection manager --

    /// Opens a connection to `url`, authenticating with the session token.
    ///
    /// Any previous connection is torn down first (close errors are
    /// swallowed), so at most one socket is ever open. On failure the error
    /// is logged and returned, the state ends `Closed`, and nothing is
    /// retried.
    pub async fn connect(&mut self, url: &str) -> Result<(), RallypointError> {
        if self.link.is_some() {
            self.disconnect().await;
        }

        let id = ConnectionId::new(NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed));
        let cancel = CancellationToken::new();
        transition(&self.state, ConnectionState::Connecting);
        let mut guard = ConnectingGuard {
            state: Arc::clone(&self.state),
            armed: true,
        };
        tracing::debug!(%id, url, "connecting");

        let request = ConnectRequest::new(url, self.session.token());
        let (sender, receiver) = match self.connector.connect(request).await {
            Ok(halves) => halves,
            Err(e) => {
                tracing::warn!(%id, url, error = %e, "connect failed");
                return Err(e.into());
            }
        };

        guard.armed = false;
        transition(&self.state, ConnectionState::Open);

        let enabled = Arc::new(AtomicBool::new(true));
        let (outbound, outbound_rx) = mpsc::unbounded_channel();

        let reader = tokio::spawn(receive_loop(
            receiver,
            ReceiveContext {
                id,
                cancel: cancel.clone(),
                enabled: Arc::clone(&enabled),
                state: Arc::clone(&self.state),
                codec: Arc::clone(&self.codec),
                inbox: self.inbox.clone(),
            },
        ));
        let writer = tokio::spawn(write_loop(id, sender, outbound_rx, cancel.clone()));

        self.link = Some(Link {
            id,
            cancel,
            enabled,
            outbound,
            reader,
            writer,
        });
        tracing::info!(%id, url, user = self.session.username(), "connected");
        Ok(())
    }

    /// Closes the connection. Safe to call in any state, any number of times.
    ///
    /// If the connection is still open, frames already queued are written
    /// and a close frame follows them (best-effort). Then the background
    /// tasks are cancelled and awaited so the socket is released, and the
    /// state is left `Closed`.
    pub async fn disconnect(&mut self) {
        let Some(link) = self.link.take() else {
            transition(&self.state, ConnectionState::Closed);
            return;
        };
        let id = link.id;

        link.enabled.store(false, Ordering::Release);
        let closing = transition(&self.state, ConnectionState::Closing)
            && link.outbound.send(Outbound::Close).is_ok();
        if !closing {
            link.cancel.cancel();
        }
        // Stops after the close frame, or at once if cancelled.
        let _ = link.writer.await;

        link.cancel.cancel();
        let _ = link.reader.await;

        transition(&self.state, ConnectionState::Closed);
        tracing::info!(%id, "disconnected");
    }

    /// Returns `true` if the connection is open.
    pub fn is_connected(&self) -> bool {
        self.state().is_open()
    }

    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Subscribes to state changes.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.subscribe()
    }

    /// The session this client was built with.
    pub fn session(&self) -> &Session {
        &self.session
    }

    // -- Send path --

    /// Sends a chat line as the session user.
    ///
    /// Fire-and-forget: dropped silently unless the connection is open.
    /// The line is not added to the local chat; it shows up only if the
    /// server echoes it back.
    pub fn send(&self, text: &str) {
        if !self.is_connected() {
            tracing::debug!("not connected, chat message dropped");
            return;
        }
        let message = ChatMessage::new(self.session.username(), text);
        match self.codec.encode_chat(&message) {
            Ok(frame) => self.enqueue(frame),
            Err(e) => tracing::warn!(error = %e, "failed to encode chat message"),
        }
    }

    /// Asks the server to pair us with an opponent.
    ///
    /// Fire-and-forget, like [`send`](Self::send).
    pub fn send_find_opponent(&self) {
        if !self.is_connected() {
            tracing::debug!("not connected, find-opponent request dropped");
            return;
        }
        match self.codec.encode_find_opponent() {
            Ok(frame) => self.enqueue(frame),
            Err(e) => tracing::warn!(error = %e, "failed to encode find-opponent request"),
        }
    }

    fn enqueue(&self, frame: String) {
        let Some(link) = &self.link else {
            return;
        };
        if link.outbound.send(Outbound::Text(frame)).is_err() {
            tracing::debug!(id = %link.id, "writer stopped, frame dropped");
        }
    }

    // -- Queue dispatcher --

    /// Registers a handler called with the opponent id of every match found.
    ///
    /// Handlers run only inside [`drain`](Self::drain), on the caller's
    /// thread, once per notification.
    pub fn on_match_found(&mut self, handler: impl FnMut(&str) + Send + 'static) {
        self.dispatcher.on_match_found(Box::new(handler));
    }

    /// Delivers everything received since the last call.
    ///
    /// Call once per tick. Match-found handlers fire first, in arrival
    /// order; then `out` is replaced with the chat lines received, in
    /// arrival order. Never blocks.
    pub fn drain(&mut self, out: &mut Vec<ChatMessage>) {
        self.dispatcher.drain(out);
    }
}

impl<C: Connector> Drop for ChatClient<C> {
    fn drop(&mut self) {
        if let Some(link) = self.link.take() {
            link.enabled.store(false, Ordering::Release);
            link.cancel.cancel();
            tracing::debug!(id = %link.id, "client dropped, connection cancelled");
        }
    }
}

