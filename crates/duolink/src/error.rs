//! Unified error type for the duolink server.

use duolink_protocol::ProtocolError;
use duolink_transport::TransportError;

/// Top-level error that wraps the crate-specific errors.
///
/// Room-layer rejections (`AlreadyInRoom`, `RoomFull`) are deliberately
/// not represented here: they are per-request outcomes reported back to
/// the offending connection as events, never faults that tear anything
/// down.
#[derive(Debug, thiserror::Error)]
pub enum DuolinkError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
