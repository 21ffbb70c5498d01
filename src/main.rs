//! Dice Room - shared dice rolling server
//!
//! The server:
//! - Relays named events between members of a room over WebSocket
//! - Serves cryptographically random bytes for client-side dice rolls
//! - Hands out fresh room names and tracks active rooms
//! - Proxies image board RSS feeds for room backdrops

mod application;
mod domain;
mod infrastructure;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::infrastructure::config::AppConfig;
use crate::infrastructure::http;
use crate::infrastructure::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dice_room=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Dice Room");

    let config = AppConfig::from_env()?;
    tracing::info!("Configuration loaded");
    tracing::info!("  Max random bytes: {}", config.max_random_bytes);
    tracing::info!("  Room idle TTL: {}s", config.room_idle_ttl_secs);

    let state = Arc::new(AppState::new(config)?);
    tracing::info!("Application state initialized");

    // Cleanup worker (drops rooms that have sat empty past the idle TTL)
    let cleanup_worker = {
        let state = state.clone();
        tokio::spawn(async move {
            tracing::info!("Starting room cleanup worker");
            let max_idle = chrono::Duration::seconds(state.config.room_idle_ttl_secs as i64);
            let mut interval = tokio::time::interval(Duration::from_secs(
                state.config.room_cleanup_interval_secs.max(1),
            ));
            loop {
                interval.tick().await;
                let mut rooms = state.rooms.write().await;
                let removed = rooms.prune_idle(max_idle, chrono::Utc::now());
                tracing::debug!(
                    "Room cleanup: pruned {}, {} rooms and {} clients remain",
                    removed.len(),
                    rooms.room_count(),
                    rooms.client_count()
                );
            }
        })
    };

    let port = state.config.server_port;
    let app = Router::new()
        .route("/health", get(health_check))
        .route("/rooms/{room}/ws", get(infrastructure::websocket::ws_handler))
        .merge(http::create_routes())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping workers...");
            cleanup_worker.abort();
            tracing::info!("Workers stopped");
        }
    }

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
