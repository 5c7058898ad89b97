//! The room registry: authoritative store of rooms and their members.

use std::collections::HashMap;

use duolink_protocol::{ParticipantId, RoomId};
use duolink_transport::ConnectionId;

/// One active room's record.
///
/// The two lists are parallel and ordered by join time: index 0 is the
/// creator. `participants.len() == connections.len()` always holds —
/// both are mutated together and nowhere else.
#[derive(Debug)]
struct RoomRecord {
    creator: ParticipantId,
    participants: Vec<ParticipantId>,
    connections: Vec<ConnectionId>,
}

/// In-memory store of room existence, membership, and join order.
///
/// A room exists exactly while it has at least one member: the record is
/// created on the first `add_member` and erased when `remove_member`
/// empties it. The registry performs no policy checks — capacity and
/// duplicate-identity rules live in the
/// [`SessionManager`](crate::SessionManager).
pub struct RoomRegistry {
    rooms: HashMap<RoomId, RoomRecord>,
}

impl RoomRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Returns `true` if the room is in the active set.
    pub fn room_exists(&self, room: &RoomId) -> bool {
        self.rooms.contains_key(room)
    }

    /// Returns the room's members in join order. Empty if absent.
    pub fn members(&self, room: &RoomId) -> &[ParticipantId] {
        self.rooms
            .get(room)
            .map(|r| r.participants.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the members' connection handles in join order.
    pub fn member_connections(&self, room: &RoomId) -> &[ConnectionId] {
        self.rooms
            .get(room)
            .map(|r| r.connections.as_slice())
            .unwrap_or(&[])
    }

    /// Returns the room's member count. Zero if absent.
    pub fn member_count(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map_or(0, |r| r.participants.len())
    }

    /// Returns the room's creator (the first joiner), if the room exists.
    pub fn creator(&self, room: &RoomId) -> Option<&ParticipantId> {
        self.rooms.get(room).map(|r| &r.creator)
    }

    /// Appends a member to the room, creating the room if absent.
    ///
    /// The first member becomes the creator. Returns the new count.
    pub fn add_member(
        &mut self,
        room: RoomId,
        participant: ParticipantId,
        connection: ConnectionId,
    ) -> usize {
        let record =
            self.rooms.entry(room).or_insert_with(|| RoomRecord {
                creator: participant.clone(),
                participants: Vec::with_capacity(2),
                connections: Vec::with_capacity(2),
            });
        record.participants.push(participant);
        record.connections.push(connection);
        record.participants.len()
    }

    /// Removes every entry matching `connection` from the room.
    ///
    /// Matched by connection, not identity: an identity does not
    /// uniquely resolve a connection. A connection holds at most one
    /// seat under the join policy, but a disconnect must leave no
    /// entry behind either way. Erases the room entirely when the last
    /// member leaves. Returns the remaining count (zero also when the
    /// room or connection was unknown).
    pub fn remove_member(
        &mut self,
        room: &RoomId,
        connection: ConnectionId,
    ) -> usize {
        let Some(record) = self.rooms.get_mut(room) else {
            return 0;
        };
        while let Some(pos) =
            record.connections.iter().position(|c| *c == connection)
        {
            record.connections.remove(pos);
            record.participants.remove(pos);
        }
        let remaining = record.participants.len();
        if remaining == 0 {
            self.rooms.remove(room);
        }
        remaining
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: &str) -> ParticipantId {
        ParticipantId::new(id)
    }

    fn conn(id: u64) -> ConnectionId {
        ConnectionId::new(id)
    }

    fn room(id: &str) -> RoomId {
        RoomId::new(id)
    }

    #[test]
    fn test_absent_room_reads_as_empty() {
        let reg = RoomRegistry::new();
        assert!(!reg.room_exists(&room("r1")));
        assert!(reg.members(&room("r1")).is_empty());
        assert!(reg.member_connections(&room("r1")).is_empty());
        assert_eq!(reg.member_count(&room("r1")), 0);
        assert_eq!(reg.creator(&room("r1")), None);
    }

    #[test]
    fn test_first_member_creates_room_and_becomes_creator() {
        let mut reg = RoomRegistry::new();
        let count = reg.add_member(room("r1"), pid("alice"), conn(1));
        assert_eq!(count, 1);
        assert!(reg.room_exists(&room("r1")));
        assert_eq!(reg.creator(&room("r1")), Some(&pid("alice")));
    }

    #[test]
    fn test_member_lists_stay_parallel_and_ordered() {
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        reg.add_member(room("r1"), pid("bob"), conn(2));

        assert_eq!(reg.members(&room("r1")), &[pid("alice"), pid("bob")]);
        assert_eq!(
            reg.member_connections(&room("r1")),
            &[conn(1), conn(2)]
        );
        assert_eq!(reg.member_count(&room("r1")), 2);
    }

    #[test]
    fn test_remove_member_matches_by_connection() {
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        reg.add_member(room("r1"), pid("bob"), conn(2));

        let remaining = reg.remove_member(&room("r1"), conn(1));
        assert_eq!(remaining, 1);
        assert_eq!(reg.members(&room("r1")), &[pid("bob")]);
        assert_eq!(reg.member_connections(&room("r1")), &[conn(2)]);
        // Creator record is historical; it is erased with the room,
        // not re-pointed when the creator leaves.
        assert_eq!(reg.creator(&room("r1")), Some(&pid("alice")));
    }

    #[test]
    fn test_last_departure_erases_all_room_state() {
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        reg.add_member(room("r1"), pid("bob"), conn(2));

        reg.remove_member(&room("r1"), conn(2));
        assert_eq!(reg.remove_member(&room("r1"), conn(1)), 0);
        assert!(!reg.room_exists(&room("r1")));
        assert_eq!(reg.creator(&room("r1")), None);
        assert_eq!(reg.room_count(), 0);
    }

    #[test]
    fn test_remove_member_purges_every_entry_for_connection() {
        // The registry itself enforces no join policy, so a connection
        // could hold two entries; one removal must clear them both.
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        reg.add_member(room("r1"), pid("alias"), conn(1));

        assert_eq!(reg.remove_member(&room("r1"), conn(1)), 0);
        assert!(!reg.room_exists(&room("r1")));
        assert_eq!(reg.room_count(), 0);
    }

    #[test]
    fn test_remove_unknown_connection_is_noop() {
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        let remaining = reg.remove_member(&room("r1"), conn(99));
        assert_eq!(remaining, 1);
        assert!(reg.room_exists(&room("r1")));
    }

    #[test]
    fn test_rooms_are_independent() {
        let mut reg = RoomRegistry::new();
        reg.add_member(room("r1"), pid("alice"), conn(1));
        reg.add_member(room("r2"), pid("bob"), conn(2));

        reg.remove_member(&room("r1"), conn(1));
        assert!(!reg.room_exists(&room("r1")));
        assert!(reg.room_exists(&room("r2")));
        assert_eq!(reg.room_count(), 1);
    }
}
