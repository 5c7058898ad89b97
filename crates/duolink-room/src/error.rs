//! Error types for the room layer.
//!
//! Both variants are request rejections reported back to the offending
//! connection, never process faults: the registry is left untouched and
//! the connection stays open. There is deliberately no "room not found"
//! — joining a nonexistent room creates it.

/// Rejections that `joinRoom` can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The joining identity already occupies a slot in the target room.
    #[error("already in room (creator: {is_creator}, players: {player_count})")]
    AlreadyInRoom {
        /// Whether the existing entry is the room's creator (first in
        /// join order).
        is_creator: bool,
        /// The room's member count at the time of the attempt.
        player_count: usize,
    },

    /// Both participant slots are taken.
    #[error("room is full ({player_count} players)")]
    RoomFull { player_count: usize },
}
