//! RPS Service
//!
//! HTTP transport for rock-paper-scissors games. Routes map onto
//! [`rps_core::GameRegistry`] operations; the core's typed failures are
//! translated into JSON error responses here.

pub mod config;
pub mod handlers;
pub mod state;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use handlers::*;
pub use state::AppState;

/// Build the service router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Games
        .route("/api/games", post(create_game))
        .route("/api/games/:id", get(get_game))
        .route("/api/games/:id/join", post(join_game))
        .route("/api/games/:id/move", post(submit_move))
        // Health
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
