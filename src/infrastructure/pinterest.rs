//! Pinterest board RSS client

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::application::ports::outbound::{BoardFeedError, BoardFeedPort};

/// Fetches board RSS feeds from Pinterest
pub struct PinterestClient {
    client: Client,
}

impl PinterestClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

/// Turn a board URL into its RSS feed URL.
///
/// Only http(s) URLs on a Pinterest host are accepted. `.rss` is appended to
/// the path unless already present.
pub fn board_feed_url(board: &str) -> Result<Url, BoardFeedError> {
    let mut url =
        Url::parse(board.trim()).map_err(|e| BoardFeedError::InvalidUrl(format!("{}: {}", board, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(BoardFeedError::InvalidUrl(board.to_string()));
    }

    let host = url
        .host_str()
        .ok_or_else(|| BoardFeedError::InvalidUrl(board.to_string()))?
        .to_ascii_lowercase();
    if !host.split('.').any(|label| label == "pinterest") {
        return Err(BoardFeedError::HostNotAllowed(host));
    }

    let path = url.path().trim_end_matches('/').to_string();
    if path.is_empty() {
        return Err(BoardFeedError::InvalidUrl(board.to_string()));
    }
    if !path.ends_with(".rss") {
        url.set_path(&format!("{}.rss", path));
    }
    Ok(url)
}

#[async_trait]
impl BoardFeedPort for PinterestClient {
    async fn fetch_board_feed(&self, board_url: &str) -> Result<String, BoardFeedError> {
        let url = board_feed_url(board_url)?;
        tracing::debug!("Fetching board feed {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BoardFeedError::Upstream(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BoardFeedError::UpstreamStatus(response.status().as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| BoardFeedError::Upstream(e.to_string()))
    }
}
