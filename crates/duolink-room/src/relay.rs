//! The event relay: inbound relay events to their opponent-facing form.
//!
//! Stateless with respect to game semantics. Payloads pass through
//! unmodified; only the event name changes to its opponent-facing
//! counterpart. Delivery (broadcast to the room group minus the sender)
//! is the transport hub's job.

use duolink_protocol::{ClientEvent, RoomId, ServerEvent};

/// Maps a relayable client event to the room it targets and the event
/// the other member should receive.
///
/// Returns `None` for the lifecycle events (`checkRoom`, `joinRoom`),
/// which are not relayed.
pub fn forward(event: ClientEvent) -> Option<(RoomId, ServerEvent)> {
    match event {
        ClientEvent::ChoosePieceColor { room_id, color } => Some((
            room_id,
            ServerEvent::OpponentChoosePieceColor { color },
        )),
        ClientEvent::UpdateOpponentScore {
            room_id,
            score,
            color,
        } => Some((
            room_id,
            ServerEvent::NewOpponentScore { score, color },
        )),
        ClientEvent::Move { room_id, mv } => {
            Some((room_id, ServerEvent::OpponentMove { mv }))
        }
        ClientEvent::Resign { room_id, identity } => {
            Some((room_id, ServerEvent::OpponentResign { identity }))
        }
        ClientEvent::OnOpponentTimeout { room_id, identity } => {
            Some((room_id, ServerEvent::OpponentTimeout { identity }))
        }
        ClientEvent::CheckRoom { .. } | ClientEvent::JoinRoom { .. } => {
            None
        }
    }
}
