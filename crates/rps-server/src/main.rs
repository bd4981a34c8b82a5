//! RPS Service
//!
//! Serves rock-paper-scissors games over HTTP.

use rps_server::config::{ConfigError, ServerConfig};
use rps_server::{create_router, AppState};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run().await {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = ServerConfig::from_env()?;
    let state = AppState::new();

    match config.finished_game_ttl {
        Some(ttl) => {
            state.spawn_eviction(ttl, config.sweep_interval);
        }
        None => tracing::info!(
            "Finished games are kept forever (set FINISHED_GAME_TTL_SECS to evict them)"
        ),
    }

    let app = create_router(state);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!("RPS service starting on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("RPS service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
