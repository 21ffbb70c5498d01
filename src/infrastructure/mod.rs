//! Infrastructure layer - External adapters and implementations
//!
//! This layer contains:
//! - HTTP: REST API routes
//! - WebSocket: room relay for connected clients
//! - Rooms: in-memory room registry
//! - Random: operating system randomness
//! - Pinterest: board feed proxy client
//! - Config: Application configuration
//! - State: Shared application state

pub mod config;
pub mod http;
pub mod pinterest;
pub mod random;
pub mod room_names;
pub mod rooms;
pub mod state;
pub mod websocket;
