//! Image board proxy route

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::application::ports::outbound::BoardFeedError;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BoardRequest {
    pub board: String,
}

/// Proxy a board's RSS feed; the XML is returned untouched
pub async fn fetch_board_images(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BoardRequest>,
) -> Result<Response, (StatusCode, String)> {
    let xml = state
        .board_feed
        .fetch_board_feed(&req.board)
        .await
        .map_err(|e| {
            tracing::warn!("Board feed fetch failed for {}: {}", req.board, e);
            let status = match e {
                BoardFeedError::InvalidUrl(_) | BoardFeedError::HostNotAllowed(_) => {
                    StatusCode::BAD_REQUEST
                }
                BoardFeedError::Upstream(_) | BoardFeedError::UpstreamStatus(_) => {
                    StatusCode::BAD_GATEWAY
                }
            };
            (status, e.to_string())
        })?;

    Ok((
        [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
        xml,
    )
        .into_response())
}
