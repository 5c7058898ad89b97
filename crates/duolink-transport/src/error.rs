/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The connection was closed.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding or accepting connections failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// The handshake was declined before upgrading to WebSocket.
    ///
    /// Covers both rejected origins and plain HTTP requests that were
    /// answered directly (the health probe). The accept loop treats this
    /// as routine, not as a fault.
    #[error("handshake declined: {0}")]
    HandshakeDeclined(String),
}
