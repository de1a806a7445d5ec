//! Client transport abstraction layer for Rallypoint.
//!
//! Provides the [`Connector`], [`FrameSender`] and [`FrameReceiver`] traits
//! that abstract over the persistent connection a client keeps to the game
//! server. A connector performs the opening handshake and hands back the two
//! halves of the connection so that writes never wait behind a pending read.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnector, WebSocketReceiver, WebSocketSender};

use std::fmt;
use std::future::Future;

/// Opaque identifier for a connection, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Creates a new `ConnectionId` from a raw `u64`.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying `u64` value.
    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Everything needed to open one connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectRequest<'a> {
    /// Server endpoint, e.g. `ws://localhost:5005/chat`.
    pub url: &'a str,
    /// Bearer token placed in the `Authorization` header of the handshake.
    pub bearer_token: &'a str,
}

impl<'a> ConnectRequest<'a> {
    /// Creates a request for `url` authenticated with `bearer_token`.
    pub fn new(url: &'a str, bearer_token: &'a str) -> Self {
        Self { url, bearer_token }
    }

    /// The value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("Bearer {}", self.bearer_token)
    }
}

/// Opens connections to a server.
///
/// The returned futures are `Send` so that the halves can be driven from
/// tasks spawned on a multi-threaded runtime.
pub trait Connector: Send + Sync + 'static {
    /// The write half produced by this connector.
    type Sender: FrameSender;
    /// The read half produced by this connector.
    type Receiver: FrameReceiver;

    /// Performs the opening handshake.
    fn connect(
        &self,
        request: ConnectRequest<'_>,
    ) -> impl Future<Output = Result<(Self::Sender, Self::Receiver), TransportError>> + Send;
}

/// The write half of a connection.
pub trait FrameSender: Send + 'static {
    /// Sends one text frame to the peer.
    fn send_text(
        &mut self,
        text: String,
    ) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Starts the close handshake.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

/// The read half of a connection.
pub trait FrameReceiver: Send + 'static {
    /// Receives the next data frame from the peer.
    ///
    /// Returns `Ok(None)` when the peer sent a close frame or the stream
    /// ended cleanly. Control frames (ping/pong) are skipped.
    fn recv(&mut self) -> impl Future<Output = Result<Option<Vec<u8>>, TransportError>> + Send;
}
