//! Routes for player configuration.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use monogatari_persistence::domain::config::GameConfig;
use tracing::instrument;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /
#[instrument(skip(state))]
async fn get_config(State(state): State<AppState>) -> Result<Json<GameConfig>, ApiError> {
    Ok(Json(state.config.load().await?))
}

/// PUT /
///
/// Out-of-range values are clamped; the response carries what was stored.
#[instrument(skip(state, config))]
async fn put_config(
    State(state): State<AppState>,
    Json(config): Json<GameConfig>,
) -> Result<Json<GameConfig>, ApiError> {
    Ok(Json(state.config.save(config).await?))
}

/// Returns the player configuration router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_config).put(put_config))
}
