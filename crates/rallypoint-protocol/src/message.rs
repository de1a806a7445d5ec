//! Message types that travel on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ChatMessage
// ---------------------------------------------------------------------------

/// One line of chat: who said it and what they said.
///
/// Immutable once constructed; the fields are only reachable through
/// accessors. On the wire the structured form is
/// `{"Message": "...", "SenderName": "..."}`.
///
/// Both fields fall back to an empty string when absent from an incoming
/// object, so any JSON object is accepted as chat. Only frames that are not
/// objects at all are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "Message", alias = "message", default)]
    message: String,

    #[serde(rename = "SenderName", alias = "senderName", default)]
    sender_name: String,
}

impl ChatMessage {
    /// Creates a chat message from `sender_name` carrying `message`.
    pub fn new(sender_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            sender_name: sender_name.into(),
        }
    }

    /// The display name of whoever sent the message. Empty when the
    /// protocol variant does not carry a sender.
    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    /// The chat text.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ChatMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.sender_name.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.sender_name, self.message)
        }
    }
}

// ---------------------------------------------------------------------------
// ControlMessage
// ---------------------------------------------------------------------------

/// Client → server control requests.
///
/// Internally tagged, so `FindMatch` serializes as `{"type":"find_match"}`
/// with no payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlMessage {
    /// "Pair me with an opponent."
    FindMatch,
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// What an incoming text frame turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A chat line, destined for the chat queue.
    Chat(ChatMessage),

    /// The server paired us with an opponent.
    MatchFound {
        /// Opaque identifier of the opponent, as sent by the server.
        opponent_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_serializes_with_pascal_case_keys() {
        let msg = ChatMessage::new("alice", "hello");
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["Message"], "hello");
        assert_eq!(json["SenderName"], "alice");
        assert_eq!(json.as_object().unwrap().len(), 2);
    }

    #[test]
    fn test_chat_message_missing_fields_default_to_empty() {
        let msg: ChatMessage = serde_json::from_str(r#"{"Message":"hi"}"#).unwrap();
        assert_eq!(msg.message(), "hi");
        assert_eq!(msg.sender_name(), "");

        let msg: ChatMessage = serde_json::from_str("{}").unwrap();
        assert_eq!(msg, ChatMessage::new("", ""));
    }

    #[test]
    fn test_chat_message_accepts_camel_case_keys() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"senderName":"bob","message":"yo"}"#).unwrap();
        assert_eq!(msg, ChatMessage::new("bob", "yo"));
    }

    #[test]
    fn test_chat_message_display() {
        assert_eq!(ChatMessage::new("bob", "gg").to_string(), "bob: gg");
        assert_eq!(ChatMessage::new("", "server restart").to_string(), "server restart");
    }

    #[test]
    fn test_find_match_json_format() {
        let json = serde_json::to_string(&ControlMessage::FindMatch).unwrap();
        assert_eq!(json, r#"{"type":"find_match"}"#);
    }
}
