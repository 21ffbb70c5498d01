//! WebSocket relay for room members
//!
//! Every frame is a JSON object `{ "event": name, "data": payload }`. The
//! server interprets only `join` and `ping`; every other event is re-emitted
//! verbatim to the rest of the room.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::mpsc;

use crate::domain::value_objects::ClientId;
use crate::infrastructure::rooms::is_valid_room_name;
use crate::infrastructure::state::AppState;

/// Event names the dice and companion clients emit. Anything else is still
/// relayed, only logged differently.
pub const ROOM_EVENTS: &[&str] = &[
    "roll",
    "clear-rolls",
    "add-die",
    "remove-die",
    "clear-dice",
    "set-modifier",
    "drag",
    "drop",
    "add-clock",
    "update-clock",
    "remove-clock",
    "add-note",
    "update-note",
    "remove-note",
    "set-background",
    "character-update",
    "character-delete",
    "request-sync",
    "sync",
    "play-x-card",
    "clear-x-card",
    "add-line",
    "remove-line",
    "add-veil",
    "remove-veil",
];

/// Events only the server emits
const SERVER_EVENTS: &[&str] = &["users", "pong", "error"];

/// One event on the wire, in either direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomFrame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl RoomFrame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn users(usernames: Vec<String>) -> Self {
        Self::new("users", json!(usernames))
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::new(
            "error",
            json!({ "code": code, "message": message.into() }),
        )
    }
}

#[derive(Debug, Deserialize)]
struct JoinPayload {
    username: String,
}

/// WebSocket upgrade handler for `/rooms/{room}/ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(room): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Response {
    if !is_valid_room_name(&room) {
        return (StatusCode::BAD_REQUEST, "Invalid room name".to_string()).into_response();
    }
    ws.on_upgrade(move |socket| handle_socket(socket, room, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, room: String, state: Arc<AppState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    let client_id = ClientId::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<RoomFrame>();

    tracing::info!("New WebSocket connection {} for room {}", client_id, room);

    // Forward frames from the channel to the socket
    let send_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Ok(text) = serde_json::to_string(&frame) {
                if ws_sender.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    if let Err(e) = state.rooms.write().await.join(&room, client_id, tx.clone()) {
        tracing::warn!("Client {} could not join room {}: {}", client_id, room, e);
        let _ = tx.send(RoomFrame::error("ROOM_ERROR", e.to_string()));
        drop(tx);
        let _ = send_task.await;
        return;
    }

    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<RoomFrame>(&text) {
                Ok(frame) => {
                    if let Some(reply) = handle_frame(frame, &state, &room, client_id).await {
                        if tx.send(reply).is_err() {
                            break;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to parse frame from {}: {}", client_id, e);
                    let error =
                        RoomFrame::error("PARSE_ERROR", format!("Invalid frame format: {}", e));
                    if tx.send(error).is_err() {
                        break;
                    }
                }
            },
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by client: {}", client_id);
                break;
            }
            Ok(Message::Ping(_)) => {
                // axum answers protocol pings itself
                tracing::trace!("Ping from {}", client_id);
            }
            Err(e) => {
                tracing::error!("WebSocket error for client {}: {}", client_id, e);
                break;
            }
            _ => {}
        }
    }

    leave_room(&state, client_id).await;

    send_task.abort();
    tracing::info!("WebSocket connection terminated: {}", client_id);
}

/// Drop a disconnected client and tell the rest of its room who is left
async fn leave_room(state: &AppState, client_id: ClientId) {
    let mut rooms = state.rooms.write().await;
    if let Some((room_name, member)) = rooms.leave(client_id) {
        tracing::info!(
            "Client {} (user: {:?}) disconnected from room {}",
            client_id,
            member.username,
            room_name
        );
        if member.username.is_some() {
            if let Ok(usernames) = rooms.usernames(&room_name) {
                rooms.broadcast(&room_name, &RoomFrame::users(usernames));
            }
        }
    }
}

/// Handle one parsed frame; the return value goes back to the sender only
async fn handle_frame(
    frame: RoomFrame,
    state: &AppState,
    room: &str,
    client_id: ClientId,
) -> Option<RoomFrame> {
    match frame.event.as_str() {
        "ping" => Some(RoomFrame::new("pong", Value::Null)),

        "join" => {
            let payload = match serde_json::from_value::<JoinPayload>(frame.data) {
                Ok(payload) => payload,
                Err(e) => {
                    return Some(RoomFrame::error(
                        "INVALID_JOIN",
                        format!("join needs a username: {}", e),
                    ))
                }
            };
            let username = payload.username.trim().to_string();
            if username.is_empty() {
                return Some(RoomFrame::error("INVALID_JOIN", "Username cannot be empty"));
            }

            let mut rooms = state.rooms.write().await;
            match rooms.set_username(client_id, username.clone()) {
                Ok(room_name) => {
                    tracing::info!("{} joined room {} as {}", client_id, room_name, username);
                    if let Ok(usernames) = rooms.usernames(&room_name) {
                        rooms.broadcast(&room_name, &RoomFrame::users(usernames));
                    }
                    None
                }
                Err(e) => Some(RoomFrame::error("ROOM_ERROR", e.to_string())),
            }
        }

        event if SERVER_EVENTS.contains(&event) => Some(RoomFrame::error(
            "RESERVED_EVENT",
            format!("'{}' is sent by the server only", event),
        )),

        event => {
            if ROOM_EVENTS.contains(&event) {
                tracing::debug!("Relaying {} in room {} from {}", event, room, client_id);
            } else {
                tracing::debug!(
                    "Relaying unrecognised event {} in room {} from {}",
                    event,
                    room,
                    client_id
                );
            }
            state.rooms.read().await.broadcast_except(room, &frame, client_id);
            None
        }
    }
}
