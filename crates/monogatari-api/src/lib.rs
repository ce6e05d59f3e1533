//! Monogatari — HTTP host.
//!
//! Owns a single engine session and exposes it to a browser front end:
//! commands go in as JSON requests, and the presentation frames the engine
//! emitted while handling them come back in the response.

pub mod config;
pub mod error;
pub mod frames;
pub mod routes;
pub mod state;

use axum::Router;

use crate::state::AppState;

/// Builds the application router over `state`, without transport layers.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/game", routes::game::router())
        .nest("/api/v1/saves", routes::saves::router())
        .nest("/api/v1/config", routes::config::router())
        .with_state(state)
}
