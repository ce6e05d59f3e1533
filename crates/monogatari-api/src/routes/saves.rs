//! Routes for save slots and save bundles.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use monogatari_core::error::EngineError;
use monogatari_engine::application::engine::{Engine, EngineSnapshot, PlaybackPhase};
use monogatari_persistence::application::slots::SlotSummary;
use monogatari_persistence::domain::save_record::SaveRecord;
use monogatari_persistence::domain::slot::SaveSlot;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::ApiError;
use crate::routes::game::{CommandResponse, settle};
use crate::state::AppState;

/// Response body for POST /import.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    /// Slots written, in slot order.
    pub imported: Vec<SaveSlot>,
}

fn snapshot_of_running(engine: &Engine) -> Result<EngineSnapshot, ApiError> {
    if *engine.phase() == PlaybackPhase::Idle {
        return Err(ApiError(EngineError::InvalidSignal(
            "no game in progress to save".to_owned(),
        )));
    }
    Ok(engine.snapshot())
}

async fn restore(state: &AppState, snapshot: EngineSnapshot) -> CommandResponse {
    let mut engine = state.engine.lock().await;
    state.frames.discard_parked();
    engine.restore(snapshot).await;
    settle(state, &engine, None).await
}

/// GET /
#[instrument(skip(state))]
async fn list(State(state): State<AppState>) -> Result<Json<Vec<SlotSummary>>, ApiError> {
    Ok(Json(state.saves.list().await?))
}

/// POST /{slot}
#[instrument(skip(state))]
async fn save(
    State(state): State<AppState>,
    Path(slot): Path<u32>,
) -> Result<Json<SaveRecord>, ApiError> {
    let slot = SaveSlot::new(slot)?;
    let engine = state.engine.lock().await;
    let snapshot = snapshot_of_running(&engine)?;
    Ok(Json(state.saves.save(slot, &snapshot).await?))
}

/// POST /{slot}/load
#[instrument(skip(state))]
async fn load(
    State(state): State<AppState>,
    Path(slot): Path<u32>,
) -> Result<Json<CommandResponse>, ApiError> {
    let snapshot = state.saves.load(SaveSlot::new(slot)?).await?;
    Ok(Json(restore(&state, snapshot).await))
}

/// DELETE /{slot}
#[instrument(skip(state))]
async fn delete(
    State(state): State<AppState>,
    Path(slot): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.saves.delete(SaveSlot::new(slot)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /quick
#[instrument(skip(state))]
async fn quick_save(State(state): State<AppState>) -> Result<Json<SaveRecord>, ApiError> {
    let engine = state.engine.lock().await;
    let snapshot = snapshot_of_running(&engine)?;
    Ok(Json(state.saves.quick_save(&snapshot).await?))
}

/// POST /quick/load
#[instrument(skip(state))]
async fn quick_load(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let snapshot = state.saves.quick_load().await?;
    Ok(Json(restore(&state, snapshot).await))
}

/// GET /export
#[instrument(skip(state))]
async fn export(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.saves.export_all().await?))
}

/// POST /import
#[instrument(skip(state, bundle))]
async fn import(
    State(state): State<AppState>,
    Json(bundle): Json<Value>,
) -> Result<Json<ImportResponse>, ApiError> {
    let imported = state.saves.import_all(&bundle).await?;
    Ok(Json(ImportResponse { imported }))
}

/// Returns the save slot router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/export", get(export))
        .route("/import", post(import))
        .route("/quick", post(quick_save))
        .route("/quick/load", post(quick_load))
        .route("/{slot}", post(save).delete(delete))
        .route("/{slot}/load", post(load))
}
