//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    infrastructure::dto::http::{HubStateDto, ParticipantDetailDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Debug endpoint exposing the Hub's membership and message count
pub async fn debug_hub_state(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HubStateDto>, StatusCode> {
    match state.hub.snapshot().await {
        Ok(snapshot) => {
            // Domain Model から DTO への変換
            let participants: Vec<ParticipantDetailDto> =
                snapshot.participants.iter().map(Into::into).collect();
            Ok(Json(HubStateDto {
                participant_count: participants.len(),
                participants,
                message_count: snapshot.message_count,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to get hub state: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
