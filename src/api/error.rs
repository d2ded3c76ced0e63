//! Error responses for the HTTP API.
//!
//! Every failure maps to a distinct status and `code`, rendered in the same
//! `{ "error": { message, type, code } }` shape.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use super::types::{ErrorBody, ErrorResponse};
use crate::agent::AgentError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body rejected before the agent ran.
    #[error("Invalid request body: {message}")]
    InvalidRequest { status: StatusCode, message: String },

    #[error(transparent)]
    Agent(#[from] AgentError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidRequest {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest { status, .. } => *status,
            ApiError::Agent(AgentError::Backend(_)) | ApiError::Agent(AgentError::EmptyResponse) => {
                StatusCode::BAD_GATEWAY
            }
            ApiError::Agent(AgentError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Agent(AgentError::UnknownTool(_))
            | ApiError::Agent(AgentError::MaxIterations(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest { .. } => "invalid_request_error",
            ApiError::Agent(AgentError::Backend(_)) | ApiError::Agent(AgentError::EmptyResponse) => {
                "backend_error"
            }
            ApiError::Agent(AgentError::Timeout(_)) => "timeout",
            ApiError::Agent(AgentError::UnknownTool(_)) => "tool_registry_mismatch",
            ApiError::Agent(AgentError::MaxIterations(_)) => "max_iterations_exceeded",
        }
    }

    /// Client-facing message. Provider error bodies are logged, never echoed.
    fn public_message(&self) -> String {
        match self {
            ApiError::Agent(AgentError::Backend(_)) | ApiError::Agent(AgentError::EmptyResponse) => {
                "The language model backend failed to produce a reply".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let r#type = if status.is_client_error() {
            "invalid_request_error"
        } else {
            "server_error"
        };

        if status.is_server_error() {
            tracing::error!(status = %status, code = self.code(), error = %self, "Chat request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Chat request rejected");
        }

        let body = ErrorResponse {
            error: ErrorBody {
                message: self.public_message(),
                r#type: r#type.to_string(),
                code: Some(self.code().to_string()),
            },
        };
        (status, Json(body)).into_response()
    }
}
