//! HTTP API.
//!
//! ## Endpoints
//!
//! - `POST /api/chat` - Send a message, receive the agent's reply
//! - `GET /api/health` - Health check

mod chat;
mod error;
mod routes;
pub mod types;

pub use error::ApiError;
pub use routes::{cors_layer, router, serve, AppState};
