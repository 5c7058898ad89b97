//! Per-connection handler: decode, dispatch, clean up.
//!
//! Each accepted connection gets its own task running this handler,
//! plus a writer task that drains the connection's hub channel onto the
//! socket. The flow is:
//!   1. Register the connection's outbound channel with the hub
//!   2. Loop: receive frames → decode [`ClientEvent`] → dispatch
//!   3. On close (clean or not): leave every joined room, tearing down
//!      rooms whose last member departed

use std::sync::Arc;

use duolink_protocol::{ClientEvent, Codec, RoomId, ServerEvent};
use duolink_room::{RoomError, relay};
use duolink_transport::{
    Connection, ConnectionId, WebSocketConnection,
};
use tokio::sync::mpsc;

use crate::DuolinkError;
use crate::server::ServerState;

pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), DuolinkError> {
    let conn_id = conn.id();
    tracing::info!(%conn_id, "client connected");

    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();
    state.core.lock().await.hub.register(conn_id, tx);

    // Writer task: hub channel → socket. Ends when the hub drops the
    // sender during cleanup below.
    let writer_conn = conn.clone();
    let writer_codec = state.codec;
    let writer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            let bytes = match writer_codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode event");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    loop {
        match conn.recv().await {
            Ok(Some(data)) => {
                let event: ClientEvent = match state.codec.decode(&data)
                {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::debug!(
                            %conn_id, error = %e,
                            "ignoring undecodable frame"
                        );
                        continue;
                    }
                };
                dispatch(&state, conn_id, event).await;
            }
            Ok(None) => {
                tracing::info!(%conn_id, "client disconnected");
                break;
            }
            Err(e) => {
                tracing::debug!(%conn_id, error = %e, "recv error");
                break;
            }
        }
    }

    // Implicit, immediate leave from every room the connection joined.
    {
        let mut core = state.core.lock().await;
        let groups = core.hub.unregister(conn_id);
        core.sessions
            .disconnect(conn_id, groups.into_iter().map(RoomId::from));
    }

    let _ = writer.await;
    let _ = conn.close().await;
    Ok(())
}

/// Dispatches one decoded client event. Never fails the connection:
/// rejections go back as events, relays are fire-and-forget.
async fn dispatch(
    state: &Arc<ServerState>,
    conn_id: ConnectionId,
    event: ClientEvent,
) {
    match event {
        ClientEvent::CheckRoom { room_id } => {
            let core = state.core.lock().await;
            let exists = core.sessions.check_room(&room_id);
            tracing::debug!(%conn_id, %room_id, exists, "room checked");
            core.hub.emit_to(
                conn_id,
                ServerEvent::RoomChecked { room_id, exists },
            );
        }

        ClientEvent::JoinRoom { room_id, user_id } => {
            let mut core = state.core.lock().await;
            match core.sessions.join_room(&room_id, user_id, conn_id) {
                Ok(accepted) => {
                    core.hub.join(conn_id, room_id.as_str());
                    core.hub.emit_to(
                        conn_id,
                        ServerEvent::RoomJoined {
                            message: if accepted.is_creator {
                                "Room created successfully!".into()
                            } else {
                                "Joined room successfully!".into()
                            },
                            is_creator: accepted.is_creator,
                            player_count: accepted.player_count,
                            user_id: conn_id,
                        },
                    );
                    // Second arrival: tell the first joiner.
                    if let Some(first) = accepted.opponent {
                        core.hub.emit_to(
                            first,
                            ServerEvent::OpponentJoined {
                                message:
                                    "Your opponent has joined the room!"
                                        .into(),
                                player_count: accepted.player_count,
                                user_id: first,
                            },
                        );
                    }
                }
                Err(RoomError::AlreadyInRoom {
                    is_creator,
                    player_count,
                }) => {
                    core.hub.emit_to(
                        conn_id,
                        ServerEvent::AlreadyInRoom {
                            message: "You are already in this room"
                                .into(),
                            is_creator,
                            player_count,
                            user_id: conn_id,
                        },
                    );
                }
                Err(RoomError::RoomFull { .. }) => {
                    core.hub.emit_to(
                        conn_id,
                        ServerEvent::RoomFull {
                            message:
                                "Room is full. Maximum 2 players allowed."
                                    .into(),
                            user_id: conn_id,
                        },
                    );
                }
            }
        }

        relayed => {
            if let ClientEvent::Move { room_id, mv } = &relayed {
                tracing::debug!(
                    %conn_id,
                    %room_id,
                    piece = mv.piece,
                    "relaying move"
                );
            }
            if let Some((room_id, outbound)) = relay::forward(relayed) {
                let core = state.core.lock().await;
                core.hub.emit_to_group_except(
                    room_id.as_str(),
                    conn_id,
                    outbound,
                );
            }
        }
    }
}
