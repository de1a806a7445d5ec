//! Wire protocol for Rallypoint.
//!
//! This crate defines the frames a game client exchanges with the chat and
//! matchmaking server over its single persistent connection:
//!
//! - **Messages** ([`ChatMessage`], [`ControlMessage`], [`Frame`]) — what
//!   travels on the wire and what an incoming frame turns into.
//! - **Codecs** ([`FrameCodec`] trait, [`JsonFrameCodec`], [`RawTextCodec`],
//!   selected through [`CodecKind`]) — how chat text is wrapped and unwrapped.
//! - **Scanner** ([`scan_match_found`]) — the cheap classifier that spots
//!   matchmaking notifications without a full parse.
//! - **Errors** ([`ProtocolError`]).
//!
//! ```text
//! Transport (bytes) → Protocol (Frame) → Client queues (chat / match found)
//! ```

mod codec;
mod error;
mod message;
mod scan;

pub use codec::{CodecKind, FrameCodec, JsonFrameCodec, RawTextCodec};
pub use error::ProtocolError;
pub use message::{ChatMessage, ControlMessage, Frame};
pub use scan::{scan_match_found, MATCH_FOUND_MARKER};
