//! Room API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use crate::infrastructure::room_names::generate_unique_room_name;
use crate::infrastructure::rooms::RoomError;
use crate::infrastructure::state::AppState;

#[derive(Debug, Serialize)]
pub struct NewRoomResponse {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct ActiveRoomsResponse {
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct RoomUsersResponse {
    pub room: String,
    pub users: Vec<String>,
}

/// Generate a fresh three-word room name and register the empty room
pub async fn new_room(
    State(state): State<Arc<AppState>>,
) -> Result<Json<NewRoomResponse>, (StatusCode, String)> {
    let mut rooms = state.rooms.write().await;
    let name = generate_unique_room_name(&mut rand::thread_rng(), |candidate| {
        rooms.room_exists(candidate)
    })
    .ok_or_else(|| {
        tracing::warn!(rooms = rooms.room_count(), "Room names exhausted");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "No free room names, try again later".to_string(),
        )
    })?;

    rooms
        .register_room(&name)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(NewRoomResponse { name }))
}

/// Number of rooms currently tracked
pub async fn active_rooms(State(state): State<Arc<AppState>>) -> Json<ActiveRoomsResponse> {
    let count = state.rooms.read().await.room_count();
    Json(ActiveRoomsResponse { count })
}

/// Usernames connected to a room
pub async fn room_users(
    State(state): State<Arc<AppState>>,
    Path(room): Path<String>,
) -> Result<Json<RoomUsersResponse>, (StatusCode, String)> {
    let users = state
        .rooms
        .read()
        .await
        .usernames(&room)
        .map_err(|e| match e {
            RoomError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        })?;

    Ok(Json(RoomUsersResponse { room, users }))
}
