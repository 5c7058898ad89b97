//! The connection hub: outbound channels and room-scoped groups.
//!
//! The hub is the broadcast primitive the session layer builds on. Each
//! connection registers an unbounded mpsc sender; a writer task on the
//! other end drains it onto the socket. Groups are named sets of
//! connections in join order. Emitting never blocks and never fails
//! loudly — a missing connection or an empty group is a silent no-op,
//! which is exactly the guarantee the relay layer relies on.
//!
//! # Concurrency note
//!
//! `Hub` is NOT thread-safe by itself — plain `HashMap`s, no interior
//! locking. The server owns one hub behind a single async mutex together
//! with the room state, so every join/emit/disconnect is one serialized
//! step. Keeping the hub lock-free here avoids hidden double-locking.

use std::collections::HashMap;

use tokio::sync::mpsc;

use crate::ConnectionId;

/// Per-process switchboard: connection senders plus named groups.
///
/// Generic over the outbound message type `M` so the transport crate does
/// not depend on the wire protocol. Messages are cloned per recipient on
/// broadcast.
pub struct Hub<M> {
    /// Outbound channel for each live connection.
    senders: HashMap<ConnectionId, mpsc::UnboundedSender<M>>,

    /// Members of each group, in join order. The order is meaningful to
    /// callers (first member of a room group is its creator).
    groups: HashMap<String, Vec<ConnectionId>>,

    /// Reverse index: the groups each connection has joined.
    memberships: HashMap<ConnectionId, Vec<String>>,
}

impl<M: Clone> Hub<M> {
    /// Creates an empty hub.
    pub fn new() -> Self {
        Self {
            senders: HashMap::new(),
            groups: HashMap::new(),
            memberships: HashMap::new(),
        }
    }

    /// Registers a connection's outbound channel.
    ///
    /// Must be called before the connection can receive anything. A
    /// re-registration under the same id replaces the old sender.
    pub fn register(
        &mut self,
        conn: ConnectionId,
        sender: mpsc::UnboundedSender<M>,
    ) {
        self.senders.insert(conn, sender);
    }

    /// Adds a connection to a named group. Joining twice is a no-op.
    pub fn join(&mut self, conn: ConnectionId, group: &str) {
        let members = self.groups.entry(group.to_string()).or_default();
        if members.contains(&conn) {
            return;
        }
        members.push(conn);
        self.memberships
            .entry(conn)
            .or_default()
            .push(group.to_string());
    }

    /// Returns the groups a connection currently belongs to.
    pub fn groups_of(&self, conn: ConnectionId) -> Vec<String> {
        self.memberships.get(&conn).cloned().unwrap_or_default()
    }

    /// Returns the members of a group in join order. Empty if absent.
    pub fn group_members(&self, group: &str) -> &[ConnectionId] {
        self.groups.get(group).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sends a message to one connection.
    ///
    /// Silently dropped if the connection is unknown or its receiver is
    /// gone (the peer disconnected mid-flight).
    pub fn emit_to(&self, conn: ConnectionId, msg: M) {
        if let Some(sender) = self.senders.get(&conn) {
            let _ = sender.send(msg);
        }
    }

    /// Broadcasts to every member of a group except `except`.
    ///
    /// An absent or otherwise-empty group is a silent no-op.
    pub fn emit_to_group_except(
        &self,
        group: &str,
        except: ConnectionId,
        msg: M,
    ) {
        let Some(members) = self.groups.get(group) else {
            return;
        };
        for member in members {
            if *member != except {
                self.emit_to(*member, msg.clone());
            }
        }
    }

    /// Removes a connection and returns the groups it belonged to.
    ///
    /// The caller uses the returned list to run its own per-group
    /// teardown (the session layer decrements room membership for each).
    pub fn unregister(&mut self, conn: ConnectionId) -> Vec<String> {
        self.senders.remove(&conn);
        let groups = self.memberships.remove(&conn).unwrap_or_default();
        for group in &groups {
            if let Some(members) = self.groups.get_mut(group) {
                members.retain(|m| *m != conn);
                if members.is_empty() {
                    self.groups.remove(group);
                }
            }
        }
        groups
    }

    /// Returns the number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.senders.len()
    }
}

impl<M: Clone> Default for Hub<M> {
    fn default() -> Self {
        Self::new()
    }
}
