//! Session lifecycle: the join/leave state machine.

use duolink_protocol::{ParticipantId, RoomId};
use duolink_transport::ConnectionId;

use crate::{RoomError, RoomRegistry};

/// Maximum participants per room.
pub const ROOM_CAPACITY: usize = 2;

/// The result of a successful join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinAccepted {
    /// Whether the joiner created the room (first member).
    pub is_creator: bool,
    /// The room's member count after this join.
    pub player_count: usize,
    /// Set when this join completed the pair: the connection of the
    /// *first* joiner (by join order), which should be told its
    /// opponent arrived.
    pub opponent: Option<ConnectionId>,
}

/// Implements join/leave transitions and the capacity/duplicate policy
/// against the [`RoomRegistry`].
///
/// Per (room, connection) pair the state machine is
/// `UNJOINED → JOINED → LEFT`, with `LEFT` terminal: a dropped
/// connection handle is never reused, a returning participant joins
/// with a fresh one.
///
/// The manager only mutates the registry and reports outcomes; actual
/// group membership and event delivery are the caller's transport
/// concern, performed under the same lock as the calls here.
pub struct SessionManager {
    registry: RoomRegistry,
}

impl SessionManager {
    /// Creates a manager over an empty registry.
    pub fn new() -> Self {
        Self {
            registry: RoomRegistry::new(),
        }
    }

    /// Returns whether the room currently exists. Pure read.
    pub fn check_room(&self, room: &RoomId) -> bool {
        self.registry.room_exists(room)
    }

    /// Attempts to join `participant` (over `connection`) to `room`,
    /// creating the room on the first join.
    ///
    /// Checks run in order against the current registry state:
    /// duplicate membership first (by identity or by connection), then
    /// capacity. Rejections leave the registry untouched.
    pub fn join_room(
        &mut self,
        room: &RoomId,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> Result<JoinAccepted, RoomError> {
        let members = self.registry.members(room);
        let count = members.len();

        if let Some(pos) =
            members.iter().position(|p| *p == participant)
        {
            tracing::debug!(
                %room, %participant, "rejected duplicate join"
            );
            return Err(RoomError::AlreadyInRoom {
                is_creator: pos == 0,
                player_count: count,
            });
        }

        // A connection that already joined stays joined; presenting a
        // new identity does not grant a second seat.
        if let Some(pos) = self
            .registry
            .member_connections(room)
            .iter()
            .position(|c| *c == connection)
        {
            tracing::debug!(
                %room, %connection, "rejected rejoin on live connection"
            );
            return Err(RoomError::AlreadyInRoom {
                is_creator: pos == 0,
                player_count: count,
            });
        }

        if count >= ROOM_CAPACITY {
            tracing::debug!(%room, %participant, "rejected join, room full");
            return Err(RoomError::RoomFull {
                player_count: count,
            });
        }

        // Resolve the first joiner before appending, so the opponent
        // notification targets them by join order.
        let first_connection =
            self.registry.member_connections(room).first().copied();

        let player_count = self.registry.add_member(
            room.clone(),
            participant.clone(),
            connection,
        );
        let is_creator = player_count == 1;

        tracing::info!(
            %room,
            %participant,
            %connection,
            player_count,
            is_creator,
            "participant joined"
        );

        Ok(JoinAccepted {
            is_creator,
            player_count,
            opponent: if player_count == ROOM_CAPACITY {
                first_connection
            } else {
                None
            },
        })
    }

    /// Removes `connection` from `room`. Returns the remaining count.
    ///
    /// The departure is silent at this layer — no event is sent to the
    /// remaining participant. When the count reaches zero the registry
    /// erases the room.
    pub fn leave(
        &mut self,
        room: &RoomId,
        connection: ConnectionId,
    ) -> usize {
        let remaining = self.registry.remove_member(room, connection);
        if remaining == 0 {
            tracing::info!(%room, %connection, "room destroyed");
        } else {
            tracing::info!(%room, %connection, remaining, "participant left");
        }
        remaining
    }

    /// Treats a disconnect as an immediate leave from every given room.
    ///
    /// `rooms` is the set of room groups the connection belonged to, as
    /// enumerated by the transport hub on teardown.
    pub fn disconnect(
        &mut self,
        connection: ConnectionId,
        rooms: impl IntoIterator<Item = RoomId>,
    ) {
        for room in rooms {
            self.leave(&room, connection);
        }
    }

    /// Read-only access to the underlying registry.
    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
