//! Wire protocol for duolink.
//!
//! This crate defines the language that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], [`Move`], the identity
//!   newtypes) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! The event names are a compatibility contract with existing clients:
//! the serde tags on [`ClientEvent`] and [`ServerEvent`] reproduce them
//! exactly. Payloads beyond the join/check events are opaque to the
//! server — they are matched, logged, and forwarded, never interpreted.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientEvent, Move, ParticipantId, RoomId, ServerEvent, Square,
};
