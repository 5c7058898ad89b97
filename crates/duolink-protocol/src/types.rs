//! Wire event types.
//!
//! Every event name here is part of the compatibility contract with the
//! deployed clients, so the serde tags are load-bearing: renaming a
//! variant or field changes the wire format. The shape tests at the
//! bottom of this module pin the exact JSON.

use std::fmt;

use duolink_transport::ConnectionId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// Opaque room identifier, supplied by the client.
///
/// No format is enforced — any string names a room, and the room comes
/// into existence the first time someone joins it.
///
/// `#[serde(transparent)]` keeps the wire form a plain string.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    /// Creates a room id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RoomId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Application-level participant identity (e.g. a user id or email).
///
/// Distinct from [`ConnectionId`]: the identity survives reconnects,
/// the connection handle does not. Duplicate-join detection is keyed by
/// this type; transport delivery is keyed by the connection.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(String);

impl ParticipantId {
    /// Creates a participant id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

// ---------------------------------------------------------------------------
// Relayed payloads
// ---------------------------------------------------------------------------

/// A board coordinate.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

/// One move, forwarded verbatim between the two participants.
///
/// The `piece` code is signed: the sign indicates the side, the
/// magnitude the piece type. The server never validates any of it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize,
)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: i8,
}

// ---------------------------------------------------------------------------
// Inbound events (client → server)
// ---------------------------------------------------------------------------

/// Events a client can send.
///
/// Internally tagged on `"event"`; the camelCase tags and field names
/// are the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    /// "Does this room currently exist?" Answered with
    /// [`ServerEvent::RoomChecked`].
    CheckRoom { room_id: RoomId },

    /// Join a room (creating it if this is the first join).
    JoinRoom {
        room_id: RoomId,
        user_id: ParticipantId,
    },

    /// Announce the sender's piece-color choice to the opponent.
    ChoosePieceColor { room_id: RoomId, color: String },

    /// Push a score update to the opponent.
    UpdateOpponentScore {
        room_id: RoomId,
        score: Vec<i32>,
        color: String,
    },

    /// Forward a move to the opponent.
    Move {
        room_id: RoomId,
        #[serde(rename = "move")]
        mv: Move,
    },

    /// The sender resigned.
    Resign { room_id: RoomId, identity: String },

    /// The sender's clock ran out.
    OnOpponentTimeout { room_id: RoomId, identity: String },
}

// ---------------------------------------------------------------------------
// Outbound events (server → client)
// ---------------------------------------------------------------------------

/// Events the server sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "event",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// Reply to [`ClientEvent::CheckRoom`], unicast to the asker.
    RoomChecked { room_id: RoomId, exists: bool },

    /// The join succeeded. `user_id` is the receiving connection's own
    /// transport handle.
    RoomJoined {
        message: String,
        is_creator: bool,
        player_count: usize,
        user_id: ConnectionId,
    },

    /// Rejection: the joining identity already occupies a slot.
    AlreadyInRoom {
        message: String,
        is_creator: bool,
        player_count: usize,
        user_id: ConnectionId,
    },

    /// Rejection: both slots are taken.
    RoomFull {
        message: String,
        user_id: ConnectionId,
    },

    /// Sent to the first joiner when the second participant arrives.
    OpponentJoined {
        message: String,
        player_count: usize,
        user_id: ConnectionId,
    },

    /// The opponent picked a piece color.
    OpponentChoosePieceColor { color: String },

    /// The opponent pushed a score update.
    NewOpponentScore { score: Vec<i32>, color: String },

    /// The opponent moved.
    OpponentMove {
        #[serde(rename = "move")]
        mv: Move,
    },

    /// The opponent resigned.
    OpponentResign { identity: String },

    /// The opponent's clock ran out.
    OpponentTimeout { identity: String },
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The event names and field spellings are what
    //! deployed clients parse, so these pin the exact JSON.

    use super::*;

    // =====================================================================
    // Identity types
    // =====================================================================

    #[test]
    fn test_room_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&RoomId::new("r1")).unwrap();
        assert_eq!(json, "\"r1\"");
    }

    #[test]
    fn test_participant_id_round_trip() {
        let pid: ParticipantId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(pid, ParticipantId::new("alice"));
        assert_eq!(pid.as_str(), "alice");
    }

    // =====================================================================
    // Inbound events — tags must match the wire contract exactly
    // =====================================================================

    #[test]
    fn test_check_room_tag() {
        let json = serde_json::to_value(ClientEvent::CheckRoom {
            room_id: RoomId::new("r1"),
        })
        .unwrap();
        assert_eq!(json["event"], "checkRoom");
        assert_eq!(json["roomId"], "r1");
    }

    #[test]
    fn test_join_room_tag_and_fields() {
        let json = serde_json::to_value(ClientEvent::JoinRoom {
            room_id: RoomId::new("r1"),
            user_id: ParticipantId::new("alice"),
        })
        .unwrap();
        assert_eq!(json["event"], "joinRoom");
        assert_eq!(json["roomId"], "r1");
        assert_eq!(json["userId"], "alice");
    }

    #[test]
    fn test_move_event_wire_shape() {
        let event = ClientEvent::Move {
            room_id: RoomId::new("r1"),
            mv: Move {
                from: Square { row: 6, col: 4 },
                to: Square { row: 4, col: 4 },
                piece: 1,
            },
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "move");
        assert_eq!(json["move"]["from"]["row"], 6);
        assert_eq!(json["move"]["to"]["col"], 4);
        assert_eq!(json["move"]["piece"], 1);
    }

    #[test]
    fn test_move_piece_code_keeps_sign() {
        let json = r#"{
            "event": "move",
            "roomId": "r1",
            "move": {
                "from": {"row": 1, "col": 0},
                "to": {"row": 3, "col": 0},
                "piece": -6
            }
        }"#;
        let event: ClientEvent = serde_json::from_str(json).unwrap();
        let ClientEvent::Move { mv, .. } = event else {
            panic!("expected move event");
        };
        assert_eq!(mv.piece, -6);
    }

    #[test]
    fn test_remaining_inbound_tags() {
        let cases = [
            (
                serde_json::to_value(ClientEvent::ChoosePieceColor {
                    room_id: RoomId::new("r1"),
                    color: "white".into(),
                })
                .unwrap(),
                "choosePieceColor",
            ),
            (
                serde_json::to_value(ClientEvent::UpdateOpponentScore {
                    room_id: RoomId::new("r1"),
                    score: vec![3, 1],
                    color: "black".into(),
                })
                .unwrap(),
                "updateOpponentScore",
            ),
            (
                serde_json::to_value(ClientEvent::Resign {
                    room_id: RoomId::new("r1"),
                    identity: "alice@example.com".into(),
                })
                .unwrap(),
                "resign",
            ),
            (
                serde_json::to_value(ClientEvent::OnOpponentTimeout {
                    room_id: RoomId::new("r1"),
                    identity: "alice@example.com".into(),
                })
                .unwrap(),
                "onOpponentTimeout",
            ),
        ];
        for (json, tag) in cases {
            assert_eq!(json["event"], tag);
        }
    }

    // =====================================================================
    // Outbound events
    // =====================================================================

    #[test]
    fn test_room_joined_wire_shape() {
        let json = serde_json::to_value(ServerEvent::RoomJoined {
            message: "Room created successfully!".into(),
            is_creator: true,
            player_count: 1,
            user_id: ConnectionId::new(7),
        })
        .unwrap();
        assert_eq!(json["event"], "roomJoined");
        assert_eq!(json["isCreator"], true);
        assert_eq!(json["playerCount"], 1);
        assert_eq!(json["userId"], 7);
    }

    #[test]
    fn test_rejection_wire_shapes() {
        let already = serde_json::to_value(ServerEvent::AlreadyInRoom {
            message: "You are already in this room".into(),
            is_creator: true,
            player_count: 1,
            user_id: ConnectionId::new(1),
        })
        .unwrap();
        assert_eq!(already["event"], "alreadyInRoom");
        assert_eq!(already["playerCount"], 1);

        let full = serde_json::to_value(ServerEvent::RoomFull {
            message: "Room is full. Maximum 2 players allowed.".into(),
            user_id: ConnectionId::new(3),
        })
        .unwrap();
        assert_eq!(full["event"], "roomFull");
        assert_eq!(full["userId"], 3);
    }

    #[test]
    fn test_opponent_joined_wire_shape() {
        let json = serde_json::to_value(ServerEvent::OpponentJoined {
            message: "Your opponent has joined the room!".into(),
            player_count: 2,
            user_id: ConnectionId::new(1),
        })
        .unwrap();
        assert_eq!(json["event"], "opponentJoined");
        assert_eq!(json["playerCount"], 2);
    }

    #[test]
    fn test_relayed_outbound_tags() {
        let cases = [
            (
                serde_json::to_value(
                    ServerEvent::OpponentChoosePieceColor {
                        color: "white".into(),
                    },
                )
                .unwrap(),
                "opponentChoosePieceColor",
            ),
            (
                serde_json::to_value(ServerEvent::NewOpponentScore {
                    score: vec![1, 2],
                    color: "black".into(),
                })
                .unwrap(),
                "newOpponentScore",
            ),
            (
                serde_json::to_value(ServerEvent::OpponentResign {
                    identity: "bob@example.com".into(),
                })
                .unwrap(),
                "opponentResign",
            ),
            (
                serde_json::to_value(ServerEvent::OpponentTimeout {
                    identity: "bob@example.com".into(),
                })
                .unwrap(),
                "opponentTimeout",
            ),
            (
                serde_json::to_value(ServerEvent::RoomChecked {
                    room_id: RoomId::new("r1"),
                    exists: false,
                })
                .unwrap(),
                "roomChecked",
            ),
        ];
        for (json, tag) in cases {
            assert_eq!(json["event"], tag);
        }
    }

    #[test]
    fn test_opponent_move_round_trip() {
        let event = ServerEvent::OpponentMove {
            mv: Move {
                from: Square { row: 0, col: 1 },
                to: Square { row: 2, col: 2 },
                piece: -2,
            },
        };
        let bytes = serde_json::to_vec(&event).unwrap();
        let decoded: ServerEvent = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(event, decoded);
    }

    // =====================================================================
    // Error cases — malformed input
    // =====================================================================

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<ClientEvent, _> =
            serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_event_returns_error() {
        let unknown = r#"{"event": "castleIntoTheSun", "roomId": "r1"}"#;
        let result: Result<ClientEvent, _> =
            serde_json::from_str(unknown);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_missing_field_returns_error() {
        // joinRoom without a userId.
        let partial = r#"{"event": "joinRoom", "roomId": "r1"}"#;
        let result: Result<ClientEvent, _> =
            serde_json::from_str(partial);
        assert!(result.is_err());
    }
}
