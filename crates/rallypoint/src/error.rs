//! Unified error type for the Rallypoint client.

use rallypoint_protocol::ProtocolError;
use rallypoint_session::SessionError;
use rallypoint_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so `?`
/// converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RallypointError {
    /// A transport-level error (handshake, send, receive, close).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid frame).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A session-level error (blank username or token).
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::InvalidRequest("no host".into());
        let client_err: RallypointError = err.into();
        assert!(matches!(client_err, RallypointError::Transport(_)));
        assert!(client_err.to_string().contains("no host"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let client_err: RallypointError = err.into();
        assert!(matches!(client_err, RallypointError::Protocol(_)));
    }

    #[test]
    fn test_from_session_error() {
        let client_err: RallypointError = SessionError::EmptyToken.into();
        assert!(matches!(client_err, RallypointError::Session(_)));
        assert_eq!(client_err.to_string(), "session token must not be empty");
    }
}
