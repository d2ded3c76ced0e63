//! Router construction and server startup.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::chat;
use crate::agent::Agent;
use crate::config::{Config, ConfigError};

/// Shared application state. Immutable after startup.
pub struct AppState {
    pub config: Config,
    pub agent: Agent,
}

/// Cross-origin policy: listed origins only, credentials allowed, POST only,
/// any request header.
pub fn cors_layer(config: &Config) -> Result<CorsLayer, ConfigError> {
    let origins = config.origin_header_values()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::POST])
        // Wildcard headers are not allowed together with credentials.
        .allow_headers(AllowHeaders::mirror_request()))
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Result<Router, ConfigError> {
    let cors = cors_layer(&state.config)?;

    Ok(Router::new()
        .route("/api/chat", post(chat::chat))
        .route("/api/health", get(chat::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// Start the HTTP server and run until Ctrl+C.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let agent = Agent::new(config.clone())?;
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let state = Arc::new(AppState { config, agent });
    let app = router(state)?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
