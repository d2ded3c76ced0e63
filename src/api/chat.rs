//! Chat and health handlers.

use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::error::ApiError;
use super::routes::AppState;
use super::types::{ChatReply, ChatRequest, HealthResponse};

/// POST /api/chat - Answer one visitor message.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatReply>, ApiError> {
    let Json(request) = payload?;

    tracing::info!(message_len = request.message.len(), "Chat request");

    let reply = state.agent.run(&request.message).await?;

    Ok(Json(ChatReply { reply }))
}

/// GET /api/health - Liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
