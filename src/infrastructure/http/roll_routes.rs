//! Server-side roll route

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::application::services::RollRequest;
use crate::domain::entities::Roll;
use crate::infrastructure::state::AppState;

#[derive(Debug, Serialize)]
pub struct RollResponse {
    #[serde(flatten)]
    pub roll: Roll,
    pub total: i64,
}

/// Roll the requested dice with server randomness
pub async fn roll_dice(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RollRequest>,
) -> Result<Json<RollResponse>, (StatusCode, String)> {
    let roll = state
        .roll_service
        .roll(req)
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;
    let total = roll.total();

    Ok(Json(RollResponse { roll, total }))
}
