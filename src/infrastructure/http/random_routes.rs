//! Random byte API

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RandomRequest {
    pub size: usize,
}

/// Byte array in the JSON shape of a Node `Buffer`, which browser clients
/// already read as `nums.data`
#[derive(Debug, Serialize)]
pub struct BufferJson {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: Vec<u8>,
}

impl BufferJson {
    pub fn new(data: Vec<u8>) -> Self {
        Self {
            kind: "Buffer",
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RandomResponse {
    pub nums: BufferJson,
}

/// Return `size` cryptographically random bytes
pub async fn random_bytes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RandomRequest>,
) -> Result<Json<RandomResponse>, (StatusCode, String)> {
    if req.size > state.config.max_random_bytes {
        return Err((
            StatusCode::BAD_REQUEST,
            format!(
                "size must be at most {} bytes",
                state.config.max_random_bytes
            ),
        ));
    }

    let bytes = state.random.random_bytes(req.size);
    tracing::debug!("Served {} random bytes", bytes.len());

    Ok(Json(RandomResponse {
        nums: BufferJson::new(bytes),
    }))
}
