//! Error types for the protocol layer.
//!
//! Each crate in duolink defines its own error enum. A `ProtocolError`
//! always means a serialization problem, never networking or room state.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    ///
    /// Common causes: malformed JSON, missing required fields, or an
    /// unknown event tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message is invalid at the protocol level even though it
    /// deserialized cleanly.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
