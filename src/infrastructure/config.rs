//! Application configuration

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP/WebSocket server port
    pub server_port: u16,
    /// Largest `size` accepted by the random byte endpoint
    pub max_random_bytes: usize,
    /// Empty rooms idle longer than this are dropped
    pub room_idle_ttl_secs: u64,
    /// How often the room cleanup worker runs
    pub room_cleanup_interval_secs: u64,
    /// Timeout for board feed requests
    pub board_fetch_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_port: 3000,
            max_random_bytes: 1024,
            room_idle_ttl_secs: 3600,
            room_cleanup_interval_secs: 300,
            board_fetch_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            server_port: env_or("SERVER_PORT", defaults.server_port)
                .context("SERVER_PORT must be a valid port number")?,
            max_random_bytes: env_or("MAX_RANDOM_BYTES", defaults.max_random_bytes)
                .context("MAX_RANDOM_BYTES must be a non-negative integer")?,
            room_idle_ttl_secs: env_or("ROOM_IDLE_TTL_SECS", defaults.room_idle_ttl_secs)
                .context("ROOM_IDLE_TTL_SECS must be a number of seconds")?,
            room_cleanup_interval_secs: env_or(
                "ROOM_CLEANUP_INTERVAL_SECS",
                defaults.room_cleanup_interval_secs,
            )
            .context("ROOM_CLEANUP_INTERVAL_SECS must be a number of seconds")?,
            board_fetch_timeout_secs: env_or(
                "PINTEREST_TIMEOUT_SECS",
                defaults.board_fetch_timeout_secs,
            )
            .context("PINTEREST_TIMEOUT_SECS must be a number of seconds")?,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(value) => Ok(value.trim().parse()?),
        Err(_) => Ok(default),
    }
}
