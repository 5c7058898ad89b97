//! # duolink
//!
//! A relay server that pairs two remote participants into a named room
//! and forwards turn-based game events (moves, resignation, timeout,
//! score updates, color choice) between them without interpreting game
//! rules.
//!
//! The layering follows transport → protocol → room:
//!
//! - `duolink-transport` — WebSocket plumbing, the connection [`Hub`],
//!   health probe, origin policy.
//! - `duolink-protocol` — the wire events (names are a compatibility
//!   contract) and the JSON codec.
//! - `duolink-room` — the registry and session lifecycle: the only part
//!   with real state and invariants.
//! - this crate — configuration, the accept loop, and the
//!   per-connection handler that wires the layers together.
//!
//! [`Hub`]: duolink_transport::Hub

mod config;
mod error;
mod handler;
mod server;

pub use config::ServerConfig;
pub use error::DuolinkError;
pub use server::{DuolinkServer, DuolinkServerBuilder};
