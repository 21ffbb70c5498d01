//! Room management for connected WebSocket clients
//!
//! A room is a named relay scope: every frame a member sends is re-emitted
//! to the other members. Rooms are created on demand, live only in this
//! process, and are pruned once they have been empty for a while.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::mpsc;

use crate::domain::value_objects::ClientId;
use crate::infrastructure::websocket::RoomFrame;

/// Longest accepted room name
pub const MAX_ROOM_NAME_LEN: usize = 64;

/// Room names are URL path segments: lowercase letters, digits, `-` and `_`
pub fn is_valid_room_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_ROOM_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// A client connected to a room
#[derive(Debug, Clone)]
pub struct RoomMember {
    pub client_id: ClientId,
    /// Display name, set once the client sends `join`
    pub username: Option<String>,
    /// Channel to send frames to this client
    pub sender: mpsc::UnboundedSender<RoomFrame>,
}

/// One named room and its members in join order
#[derive(Debug)]
pub struct Room {
    pub name: String,
    pub last_activity: DateTime<Utc>,
    members: Vec<RoomMember>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            last_activity: Utc::now(),
            members: Vec::new(),
        }
    }

    pub fn add_member(&mut self, client_id: ClientId, sender: mpsc::UnboundedSender<RoomFrame>) {
        self.members.push(RoomMember {
            client_id,
            username: None,
            sender,
        });
        self.touch();
    }

    pub fn remove_member(&mut self, client_id: ClientId) -> Option<RoomMember> {
        let pos = self.members.iter().position(|m| m.client_id == client_id)?;
        self.touch();
        Some(self.members.remove(pos))
    }

    /// Usernames of members that have joined, in join order
    pub fn usernames(&self) -> Vec<String> {
        self.members
            .iter()
            .filter_map(|m| m.username.clone())
            .collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }

    /// Send a frame to every member
    pub fn broadcast(&self, frame: &RoomFrame) {
        for member in &self.members {
            send_frame(member, frame);
        }
    }

    /// Send a frame to every member except one
    pub fn broadcast_except(&self, frame: &RoomFrame, exclude: ClientId) {
        for member in self.members.iter().filter(|m| m.client_id != exclude) {
            send_frame(member, frame);
        }
    }
}

fn send_frame(member: &RoomMember, frame: &RoomFrame) {
    if let Err(e) = member.sender.send(frame.clone()) {
        tracing::warn!("Failed to send frame to client {}: {}", member.client_id, e);
    }
}

/// Error types for room operations
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    #[error("Room not found: {0}")]
    NotFound(String),

    #[error("Invalid room name: {0}")]
    InvalidName(String),

    #[error("Client not in any room: {0}")]
    ClientNotInRoom(ClientId),
}

/// Manages all rooms in this process
#[derive(Debug, Default)]
pub struct RoomManager {
    rooms: HashMap<String, Room>,
    /// Maps client IDs to the room they are in
    client_rooms: HashMap<ClientId, String>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a room without members. Registering an existing room is a no-op.
    pub fn register_room(&mut self, name: &str) -> Result<(), RoomError> {
        if !is_valid_room_name(name) {
            return Err(RoomError::InvalidName(name.to_string()));
        }
        if !self.rooms.contains_key(name) {
            self.rooms.insert(name.to_string(), Room::new(name));
            tracing::info!("Registered room {}", name);
        }
        Ok(())
    }

    pub fn room_exists(&self, name: &str) -> bool {
        self.rooms.contains_key(name)
    }

    /// Add a client to a room, creating the room if needed
    pub fn join(
        &mut self,
        room: &str,
        client_id: ClientId,
        sender: mpsc::UnboundedSender<RoomFrame>,
    ) -> Result<(), RoomError> {
        self.register_room(room)?;
        if let Some(previous) = self.client_rooms.get(&client_id).cloned() {
            self.leave(client_id);
            tracing::debug!("Client {} moved from room {} to {}", client_id, previous, room);
        }

        let entry = self
            .rooms
            .get_mut(room)
            .ok_or_else(|| RoomError::NotFound(room.to_string()))?;
        entry.add_member(client_id, sender);
        self.client_rooms.insert(client_id, room.to_string());

        tracing::info!(
            "Client {} joined room {} ({} members)",
            client_id,
            room,
            entry.member_count()
        );
        Ok(())
    }

    /// Record the display name a client announced
    pub fn set_username(&mut self, client_id: ClientId, username: String) -> Result<String, RoomError> {
        let room_name = self
            .client_rooms
            .get(&client_id)
            .ok_or(RoomError::ClientNotInRoom(client_id))?;
        let room = self
            .rooms
            .get_mut(room_name)
            .ok_or_else(|| RoomError::NotFound(room_name.clone()))?;
        let member = room
            .members
            .iter_mut()
            .find(|m| m.client_id == client_id)
            .ok_or(RoomError::ClientNotInRoom(client_id))?;

        member.username = Some(username);
        room.touch();
        Ok(room_name.clone())
    }

    /// Remove a client from its room. Empty rooms stay registered until pruned.
    pub fn leave(&mut self, client_id: ClientId) -> Option<(String, RoomMember)> {
        let room_name = self.client_rooms.remove(&client_id)?;
        let room = self.rooms.get_mut(&room_name)?;
        let member = room.remove_member(client_id)?;

        tracing::info!(
            "Client {} left room {} (user: {:?})",
            client_id,
            room_name,
            member.username
        );
        Some((room_name, member))
    }

    #[cfg(test)]
    pub fn get_room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn usernames(&self, room: &str) -> Result<Vec<String>, RoomError> {
        self.rooms
            .get(room)
            .map(Room::usernames)
            .ok_or_else(|| RoomError::NotFound(room.to_string()))
    }

    /// Broadcast a frame to all members of a room
    pub fn broadcast(&self, room: &str, frame: &RoomFrame) {
        if let Some(room) = self.rooms.get(room) {
            room.broadcast(frame);
        }
    }

    /// Broadcast a frame to all members of a room except the sender
    pub fn broadcast_except(&self, room: &str, frame: &RoomFrame, exclude: ClientId) {
        if let Some(room) = self.rooms.get(room) {
            room.broadcast_except(frame, exclude);
        }
    }

    /// Number of tracked rooms, empty ones included
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of connected clients across all rooms
    pub fn client_count(&self) -> usize {
        self.client_rooms.len()
    }

    /// Drop empty rooms whose last activity is older than `max_idle`.
    /// Returns the names of the removed rooms.
    pub fn prune_idle(&mut self, max_idle: Duration, now: DateTime<Utc>) -> Vec<String> {
        let stale: Vec<String> = self
            .rooms
            .values()
            .filter(|room| room.is_empty() && now - room.last_activity > max_idle)
            .map(|room| room.name.clone())
            .collect();

        for name in &stale {
            self.rooms.remove(name);
            tracing::info!("Removed idle room {}", name);
        }
        stale
    }
}
