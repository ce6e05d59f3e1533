//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use monogatari_core::storage::KeyValueStore;
use monogatari_scenario::application::source::ChapterSource;
use monogatari_test_support::{FixedClock, RecordingErrorReporter, StaticChapterSource};
use tower::ServiceExt;

use monogatari_api::state::AppState;

/// Prologue used across the game and save tests.
///
/// Scene `start`: narration, dialogue with a sprite, a choice whose second
/// option is hidden at the starting affection, narration. Scene `pause`: a
/// 20 ms wait, then narration.
pub const PROLOGUE: &str = r#"{
    "title": "序章：運命の逃走",
    "scenes": [
        { "id": "start", "background": "yomi_entrance", "bgm": "tension", "lines": [
            { "type": "narration", "text": "黄泉の入口。" },
            { "type": "dialogue", "speaker": "イザナミ", "text": "待って。",
              "character": { "name": "izanami", "expression": "sad", "position": "center" } },
            { "type": "choice", "text": "どうする？", "options": [
                { "text": "約束する", "effects": { "affection": 10, "flag": "promise_made" } },
                { "text": "秘密", "condition": "affection >= 90" },
                { "text": "逃げる", "effects": { "trust": -10 } }
            ] },
            { "type": "narration", "text": "約束した。" }
        ] },
        { "id": "pause", "lines": [
            { "type": "wait", "duration": 20 },
            { "type": "narration", "text": "静寂。" }
        ] }
    ]
}"#;

/// First chapter after the prologue.
pub const CHAPTER1: &str = r#"{
    "scenes": [
        { "id": "scene1-1", "background": "takamagahara", "lines": [
            { "type": "narration", "text": "高天原。" }
        ] }
    ]
}"#;

/// The two-chapter scenario above.
pub fn scenario() -> Arc<StaticChapterSource> {
    Arc::new(
        StaticChapterSource::new()
            .with_json("prologue", PROLOGUE)
            .with_json("chapter1", CHAPTER1),
    )
}

/// Build the full app router over in-memory collaborators and a fixed
/// clock. Uses the same route structure as `main.rs`.
pub fn build_test_app(source: Arc<dyn ChapterSource>, store: Arc<dyn KeyValueStore>) -> Router {
    let app_state = AppState::new(
        source,
        store,
        Arc::new(FixedClock::at(2026, 1, 15, 10, 0, 0)),
        Arc::new(RecordingErrorReporter::new()),
    );
    monogatari_api::build_router(app_state)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the status.
pub async fn delete(app: Router, uri: &str) -> StatusCode {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await.0
}

/// Texts of the narration and dialogue frames in a command response.
pub fn frame_texts(response: &serde_json::Value) -> Vec<String> {
    response["frames"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|frame| frame["text"].as_str())
        .map(str::to_owned)
        .collect()
}
