//! Routes driving the playback session.
//!
//! Every command locks the session, runs the engine to its next suspension
//! point and answers with the frames that produced plus a status view.
//! `wait` lines are timed here: the host sleeps on a spawned task and hands
//! the engine the token it was issued, which the engine ignores if the
//! session has moved on in the meantime. Whatever the resumed playback
//! emits is parked for `GET /frames`.

use std::collections::BTreeMap;
use std::time::Duration;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use monogatari_engine::application::engine::{Engine, PlaybackPhase, TimerToken};
use monogatari_engine::domain::backlog::BacklogEntry;
use monogatari_engine::domain::cursor::PlaybackCursor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::frames::Frame;
use crate::state::AppState;

/// Request body for POST /choose.
#[derive(Debug, Deserialize)]
pub struct ChooseRequest {
    /// Display index of the picked option.
    pub index: usize,
}

/// Request body for POST /skip and POST /auto.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// New mode value.
    pub enabled: bool,
}

/// Request body for POST /jump.
#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    /// Chapter index to jump to.
    pub chapter: usize,
}

/// Where the session stands.
#[derive(Debug, Serialize)]
pub struct StatusView {
    /// Current session.
    pub session_id: Uuid,
    /// Suspension the engine is in.
    pub state: PlaybackPhase,
    /// Playback position.
    pub cursor: PlaybackCursor,
    /// Current affection.
    pub affection: i32,
    /// Current trust.
    pub trust: i32,
    /// Current route label.
    pub route: String,
    /// Every known flag.
    pub flags: BTreeMap<String, bool>,
    /// Whether read lines are skipped.
    pub skip_mode: bool,
    /// Whether the client advances on its own.
    pub auto_mode: bool,
}

impl StatusView {
    /// Status of `engine` right now.
    #[must_use]
    pub fn of(engine: &Engine) -> Self {
        let state = engine.state();
        Self {
            session_id: engine.session_id(),
            state: engine.phase().clone(),
            cursor: engine.cursor(),
            affection: state.affection(),
            trust: state.trust(),
            route: state.route().to_owned(),
            flags: state.flags().clone(),
            skip_mode: engine.skip_mode(),
            auto_mode: engine.auto_mode(),
        }
    }
}

/// Response body returned after a command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// Frames emitted while handling the command, oldest first.
    pub frames: Vec<Frame>,
    /// Status after the command.
    pub status: StatusView,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct GameView {
    /// Current status.
    pub status: StatusView,
    /// Display history, oldest first.
    pub backlog: Vec<BacklogEntry>,
}

/// Response body for GET /frames.
#[derive(Debug, Serialize)]
pub struct FramesResponse {
    /// Frames timers produced since the last request, oldest first.
    pub frames: Vec<Frame>,
}

/// Finishes a command that moved playback: starts the timer for a `wait`
/// suspension, auto-saves on entering a new chapter, and collects the
/// frames for the response.
pub(crate) async fn settle(
    state: &AppState,
    engine: &Engine,
    chapter_before: Option<usize>,
) -> CommandResponse {
    schedule_timer(state, engine.phase());
    auto_save_on_chapter_change(state, engine, chapter_before).await;
    CommandResponse {
        frames: state.frames.drain(),
        status: StatusView::of(engine),
    }
}

fn schedule_timer(state: &AppState, phase: &PlaybackPhase) {
    if let PlaybackPhase::AwaitingTimer { token, duration_ms } = phase {
        let state = state.clone();
        let (token, duration_ms) = (*token, *duration_ms);
        tokio::spawn(async move {
            run_timer(state, token, duration_ms).await;
        });
    }
}

async fn run_timer(state: AppState, token: TimerToken, duration_ms: u64) {
    let mut pending = Some((token, duration_ms));
    while let Some((token, duration_ms)) = pending.take() {
        tokio::time::sleep(Duration::from_millis(duration_ms)).await;

        let mut engine = state.engine.lock().await;
        let chapter_before = Some(engine.cursor().chapter());
        match engine.resume_timer(token).await {
            Some(PlaybackPhase::AwaitingTimer { token, duration_ms }) => {
                pending = Some((token, duration_ms));
            }
            Some(phase) => {
                debug!(phase = phase.name(), "timer resumed playback");
            }
            None => {
                debug!(generation = token.generation(), "stale timer ignored");
            }
        }
        auto_save_on_chapter_change(&state, &engine, chapter_before).await;
        state.frames.park();
    }
}

async fn auto_save_on_chapter_change(
    state: &AppState,
    engine: &Engine,
    chapter_before: Option<usize>,
) {
    let chapter = engine.cursor().chapter();
    let entered_new_chapter = chapter_before.is_some_and(|before| before != chapter);
    if !entered_new_chapter || matches!(engine.phase(), PlaybackPhase::Done { .. }) {
        return;
    }
    match state.saves.auto_save(&engine.snapshot()).await {
        Ok(_) => info!(chapter, "auto-saved on chapter entry"),
        Err(e) => warn!(chapter, error = %e, "auto-save failed"),
    }
}

fn chapter_of(engine: &Engine) -> Option<usize> {
    (*engine.phase() != PlaybackPhase::Idle).then(|| engine.cursor().chapter())
}

/// POST /new
#[instrument(skip(state))]
async fn new_game(State(state): State<AppState>) -> Json<CommandResponse> {
    let mut engine = state.engine.lock().await;
    state.frames.discard_parked();
    let phase = engine.new_game().await;
    info!(session_id = %engine.session_id(), phase = phase.name(), "new game started");
    Json(settle(&state, &engine, None).await)
}

/// POST /advance
#[instrument(skip(state))]
async fn advance(State(state): State<AppState>) -> Result<Json<CommandResponse>, ApiError> {
    let mut engine = state.engine.lock().await;
    let chapter_before = chapter_of(&engine);
    engine.advance().await?;
    Ok(Json(settle(&state, &engine, chapter_before).await))
}

/// POST /choose
#[instrument(skip(state, request), fields(index = request.index))]
async fn choose(
    State(state): State<AppState>,
    Json(request): Json<ChooseRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let mut engine = state.engine.lock().await;
    let chapter_before = chapter_of(&engine);
    engine.choose(request.index).await?;
    Ok(Json(settle(&state, &engine, chapter_before).await))
}

/// POST /skip
///
/// Switching skip on while a line is on screen advances past it, so this
/// answers like any other command.
#[instrument(skip(state, request), fields(enabled = request.enabled))]
async fn set_skip(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Json<CommandResponse> {
    let mut engine = state.engine.lock().await;
    let chapter_before = chapter_of(&engine);
    engine.set_skip_mode(request.enabled).await;
    Json(settle(&state, &engine, chapter_before).await)
}

/// POST /auto
#[instrument(skip(state, request), fields(enabled = request.enabled))]
async fn set_auto(
    State(state): State<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Json<StatusView> {
    let mut engine = state.engine.lock().await;
    engine.set_auto_mode(request.enabled);
    Json(StatusView::of(&engine))
}

/// POST /jump
#[instrument(skip(state, request), fields(chapter = request.chapter))]
async fn jump(
    State(state): State<AppState>,
    Json(request): Json<JumpRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let mut engine = state.engine.lock().await;
    engine.jump_to_chapter(request.chapter).await?;
    state.frames.discard_parked();
    // A debug jump is not a chapter the player reached, so no auto-save.
    Ok(Json(settle(&state, &engine, None).await))
}

/// GET /
#[instrument(skip(state))]
async fn status(State(state): State<AppState>) -> Json<GameView> {
    let engine = state.engine.lock().await;
    Json(GameView {
        status: StatusView::of(&engine),
        backlog: engine.backlog().iter().cloned().collect(),
    })
}

/// GET /frames
///
/// Frames a `wait` timer produced since the client last asked.
#[instrument(skip(state))]
async fn frames(State(state): State<AppState>) -> Json<FramesResponse> {
    // Lock so a timer task mid-dispatch finishes before the drain.
    let _engine = state.engine.lock().await;
    Json(FramesResponse {
        frames: state.frames.drain_parked(),
    })
}

/// Returns the game session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(status))
        .route("/frames", get(frames))
        .route("/new", post(new_game))
        .route("/advance", post(advance))
        .route("/choose", post(choose))
        .route("/skip", post(set_skip))
        .route("/auto", post(set_auto))
        .route("/jump", post(jump))
}
