//! Shared application state

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{BoardFeedPort, RandomPort};
use crate::application::services::RollService;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::pinterest::PinterestClient;
use crate::infrastructure::random::OsRandomAdapter;
use crate::infrastructure::rooms::RoomManager;

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    /// Active rooms and their WebSocket members
    pub rooms: RwLock<RoomManager>,
    pub random: Arc<dyn RandomPort>,
    pub board_feed: Arc<dyn BoardFeedPort>,
    pub roll_service: RollService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let board_feed = PinterestClient::new(Duration::from_secs(config.board_fetch_timeout_secs))?;
        Ok(Self::with_ports(
            config,
            Arc::new(OsRandomAdapter),
            Arc::new(board_feed),
        ))
    }

    /// Build state around explicit port implementations
    pub fn with_ports(
        config: AppConfig,
        random: Arc<dyn RandomPort>,
        board_feed: Arc<dyn BoardFeedPort>,
    ) -> Self {
        let roll_service = RollService::new(random.clone(), config.max_random_bytes);
        Self {
            config,
            rooms: RwLock::new(RoomManager::new()),
            random,
            board_feed,
            roll_service,
        }
    }
}
