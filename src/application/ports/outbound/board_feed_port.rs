//! Board feed port - fetching image board RSS feeds for room backdrops

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum BoardFeedError {
    #[error("Invalid board URL: {0}")]
    InvalidUrl(String),
    #[error("Board host not allowed: {0}")]
    HostNotAllowed(String),
    #[error("Upstream request failed: {0}")]
    Upstream(String),
    #[error("Upstream returned status {0}")]
    UpstreamStatus(u16),
}

/// Fetches the raw RSS XML of an image board.
///
/// The XML is handed to clients untouched; parsing happens client-side.
#[async_trait]
pub trait BoardFeedPort: Send + Sync {
    async fn fetch_board_feed(&self, board_url: &str) -> Result<String, BoardFeedError>;
}
