//! Error types for the protocol layer.
//!
//! Every error here is a *parse* or *encode* failure for a single frame.
//! None of them is fatal to a connection: the receive path drops the frame
//! and keeps going.

/// Errors that can occur while encoding or decoding frames.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization of an outgoing envelope failed.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// The frame is not valid JSON, or not the shape the codec expects.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame payload is not valid UTF-8 text.
    #[error("frame is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// The frame decoded but violates the protocol (e.g. it is empty).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
