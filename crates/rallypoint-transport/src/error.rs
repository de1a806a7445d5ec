/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connect request could not be built (bad URL, bad header value).
    #[error("invalid connect request: {0}")]
    InvalidRequest(String),

    /// The opening handshake failed.
    #[error("connect failed: {0}")]
    ConnectFailed(#[source] std::io::Error),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The close handshake could not be sent.
    #[error("close failed: {0}")]
    CloseFailed(#[source] std::io::Error),
}
