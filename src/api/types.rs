//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The visitor's message
    pub message: String,
}

/// Response body for `POST /api/chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    /// The agent's final answer
    pub reply: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}
