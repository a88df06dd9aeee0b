//! Route handler functions for the API endpoints.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use charla_skill::{RequestEnvelope, ResponseEnvelope};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /skill - handle one voice-platform request envelope.
pub async fn skill(
    State(state): State<AppState>,
    Json(envelope): Json<RequestEnvelope>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    if let Some(expected) = state.application_id.as_deref() {
        let received = envelope.application_id();
        if received != Some(expected) {
            tracing::warn!(
                received = received.unwrap_or("<none>"),
                "Rejected request for another skill"
            );
            return Err(ApiError::BadRequest(
                "request is addressed to a different skill".to_string(),
            ));
        }
    }

    let response = state.dispatcher.dispatch(envelope).await;
    Ok(Json(response))
}
