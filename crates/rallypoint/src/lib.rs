//! # Rallypoint
//!
//! Realtime chat and matchmaking client transport for games.
//!
//! A [`ChatClient`] keeps one persistent connection to the game server and
//! multiplexes two kinds of traffic over it: chat lines and matchmaking
//! notifications. Frames are received on a background task and buffered
//! until the game's main loop calls [`ChatClient::drain`] once per tick, so
//! a single-threaded consumer never touches the network directly.
//!
//! ```text
//! connect ─→ receive task ─→ codec ─┬─→ chat queue ──┐
//!                                   └─→ match queue ─┴─→ drain (per tick)
//! send / send_find_opponent ─→ writer task ─→ socket
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rallypoint::prelude::*;
//!
//! # async fn run() -> Result<(), RallypointError> {
//! let session = Session::new("alice", "<jwt from login>")?;
//! let mut client = ChatClient::builder().build(session);
//! client.on_match_found(|opponent| println!("matched against {opponent}"));
//!
//! client.connect("ws://localhost:5005/chat").await?;
//! client.send("hello");
//! client.send_find_opponent();
//!
//! let mut incoming = Vec::new();
//! loop {
//!     client.drain(&mut incoming); // once per frame
//!     for line in &incoming {
//!         println!("{line}");
//!     }
//!     # break;
//! }
//! client.disconnect().await;
//! # Ok(())
//! # }
//! ```

mod client;
mod dispatch;
mod error;
mod history;
mod receive;
mod state;

pub use client::{ChatClient, ChatClientBuilder, ClientConfig};
pub use dispatch::MatchFoundHandler;
pub use error::RallypointError;
pub use history::{ChatHistory, DEFAULT_HISTORY_CAPACITY};
pub use state::ConnectionState;

/// Everything a game needs to wire up chat and matchmaking.
pub mod prelude {
    pub use crate::{
        ChatClient, ChatClientBuilder, ChatHistory, ClientConfig, ConnectionState,
        RallypointError,
    };
    pub use rallypoint_protocol::{ChatMessage, CodecKind, FrameCodec};
    pub use rallypoint_session::{Session, SessionError};
    pub use rallypoint_transport::{ConnectRequest, Connector, WebSocketConnector};
}
