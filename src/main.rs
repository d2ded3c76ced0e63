//! hive-agent - HTTP Server Entry Point
//!
//! Loads configuration and starts the chat API.

use hive_agent::{api, config, config::Config};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up a local .env before anything reads the environment (RUST_LOG included).
    let dotenv = config::load_dotenv();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hive_agent=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(Some(path)) => info!("Loaded environment from {}", path.display()),
        Ok(None) => {}
        Err(e) => warn!("{}", e),
    }

    // Missing GOOGLE_API_KEY aborts here, before any route exists.
    let config = Config::from_env()?;
    info!(
        "Loaded configuration: model={}, max_iterations={}, origins={}",
        config.default_model,
        config.max_iterations,
        config.allowed_origins.join(",")
    );

    api::serve(config).await?;

    Ok(())
}
