//! Room and session lifecycle for duolink.
//!
//! This is the only crate with real state and invariants. Three pieces:
//!
//! - [`RoomRegistry`] — the authoritative in-memory store of room
//!   existence, membership, and join order. A pure store: it performs
//!   no policy checks.
//! - [`SessionManager`] — the join/leave state machine. Enforces the
//!   two-participant capacity and duplicate-identity policy against the
//!   registry and decides who gets notified.
//! - [`relay`] — the stateless mapping from an inbound relay event to
//!   the outbound event broadcast to the other room member.
//!
//! All operations here are synchronous; the server serializes them
//! behind one async mutex, which is what makes "first join wins the
//! creator slot" well defined.

mod error;
mod manager;
mod registry;
pub mod relay;

pub use error::RoomError;
pub use manager::{JoinAccepted, ROOM_CAPACITY, SessionManager};
pub use registry::RoomRegistry;
