//! Frame codecs: how chat text is wrapped for the wire and unwrapped again.
//!
//! Servers speak one of two chat dialects. The structured dialect wraps
//! every line in a `{"Message", "SenderName"}` object; the reduced dialect
//! sends the bare text. Both share the same matchmaking notification and
//! find-opponent request. The [`FrameCodec`] trait captures the difference
//! so the client itself is written once, and [`CodecKind`] picks the
//! implementation from configuration.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{scan_match_found, ChatMessage, ControlMessage, Frame, ProtocolError};

/// Encodes outgoing frames and classifies incoming ones.
///
/// `Send + Sync + 'static` because a single codec instance is shared between
/// the consumer (encoding sends) and the background receive task (decoding).
/// Methods are not generic so the trait can be used as `dyn FrameCodec`.
pub trait FrameCodec: Send + Sync + 'static {
    /// Wraps an outgoing chat line in this dialect's envelope.
    fn encode_chat(&self, message: &ChatMessage) -> Result<String, ProtocolError>;

    /// Decodes a frame already known not to be a matchmaking notification.
    fn decode_chat(&self, text: &str) -> Result<ChatMessage, ProtocolError>;

    /// Encodes the find-opponent request. Identical in every dialect.
    fn encode_find_opponent(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(&ControlMessage::FindMatch).map_err(ProtocolError::Encode)
    }

    /// Classifies a text frame.
    ///
    /// Matchmaking wins when [`scan_match_found`] finds a well-formed
    /// opponent id; anything else is handed to [`decode_chat`](Self::decode_chat).
    fn classify(&self, text: &str) -> Result<Frame, ProtocolError> {
        match scan_match_found(text) {
            Some(opponent_id) => Ok(Frame::MatchFound {
                opponent_id: opponent_id.to_string(),
            }),
            None => self.decode_chat(text).map(Frame::Chat),
        }
    }

    /// Decodes raw frame bytes as UTF-8 and classifies the result.
    fn decode_frame(&self, data: &[u8]) -> Result<Frame, ProtocolError> {
        let text = std::str::from_utf8(data)?;
        self.classify(text)
    }
}

// ---------------------------------------------------------------------------
// JsonFrameCodec
// ---------------------------------------------------------------------------

/// Structured dialect: chat lines travel as
/// `{"Message": "...", "SenderName": "..."}`.
///
/// Decoding is lenient. Missing fields become empty strings, unknown fields
/// are ignored, and only input that is not a JSON object fails.
///
/// ```rust
/// use rallypoint_protocol::{ChatMessage, FrameCodec, JsonFrameCodec};
///
/// let codec = JsonFrameCodec;
/// let text = codec.encode_chat(&ChatMessage::new("alice", "gl hf")).unwrap();
/// assert_eq!(text, r#"{"Message":"gl hf","SenderName":"alice"}"#);
/// assert_eq!(
///     codec.decode_chat(&text).unwrap(),
///     ChatMessage::new("alice", "gl hf"),
/// );
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFrameCodec;

impl FrameCodec for JsonFrameCodec {
    fn encode_chat(&self, message: &ChatMessage) -> Result<String, ProtocolError> {
        serde_json::to_string(message).map_err(ProtocolError::Encode)
    }

    fn decode_chat(&self, text: &str) -> Result<ChatMessage, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

// ---------------------------------------------------------------------------
// RawTextCodec
// ---------------------------------------------------------------------------

/// Reduced dialect: a chat frame is the bare message text.
///
/// Outgoing frames drop the sender (the server attaches it). Incoming
/// frames carry no sender, so decoded messages have an empty
/// [`sender_name`](ChatMessage::sender_name).
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTextCodec;

impl FrameCodec for RawTextCodec {
    fn encode_chat(&self, message: &ChatMessage) -> Result<String, ProtocolError> {
        Ok(message.message().to_string())
    }

    fn decode_chat(&self, text: &str) -> Result<ChatMessage, ProtocolError> {
        if text.is_empty() {
            return Err(ProtocolError::InvalidMessage("empty chat frame".into()));
        }
        Ok(ChatMessage::new("", text))
    }
}

// ---------------------------------------------------------------------------
// CodecKind
// ---------------------------------------------------------------------------

/// Which chat dialect the server speaks.
///
/// Parses from `"json"` / `"raw"` (case-insensitive) so it can come straight
/// from a command line or config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// [`JsonFrameCodec`].
    #[default]
    Json,
    /// [`RawTextCodec`].
    RawText,
}

impl CodecKind {
    /// Instantiates the selected codec.
    pub fn build(self) -> Arc<dyn FrameCodec> {
        match self {
            Self::Json => Arc::new(JsonFrameCodec),
            Self::RawText => Arc::new(RawTextCodec),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::RawText => write!(f, "raw"),
        }
    }
}

impl FromStr for CodecKind {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "raw" | "raw_text" | "text" => Ok(Self::RawText),
            other => Err(ProtocolError::InvalidMessage(format!(
                "unknown codec `{other}` (expected `json` or `raw`)"
            ))),
        }
    }
}
