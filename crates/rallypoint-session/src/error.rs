//! Error types for the session layer.

/// Errors raised while building a [`Session`](crate::Session).
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The username was empty or whitespace. Outgoing chat would carry no
    /// sender.
    #[error("session username must not be empty")]
    EmptyUsername,

    /// The bearer token was empty or whitespace. The server would reject
    /// the handshake.
    #[error("session token must not be empty")]
    EmptyToken,
}
