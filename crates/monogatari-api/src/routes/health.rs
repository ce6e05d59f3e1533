//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness report.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `ok` when the server answers.
    pub status: &'static str,
    /// Package name of the running binary.
    pub service: &'static str,
    /// Package version of the running binary.
    pub version: &'static str,
    /// Where the playback session is suspended, `idle` before a game starts.
    pub session: &'static str,
}

/// GET /health
///
/// Waits for the session lock, so a wedged engine shows up as a hung probe.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let session = state.engine.lock().await.phase().name();
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        session,
    })
}

/// Returns the liveness router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
