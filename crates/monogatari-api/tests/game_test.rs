//! Integration tests for the game session routes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use monogatari_test_support::{FailingChapterSource, InMemoryKeyValueStore};
use serde_json::json;

use common::{frame_texts, get_json, post_empty, post_json};

fn app() -> (Router, Arc<InMemoryKeyValueStore>) {
    let store = Arc::new(InMemoryKeyValueStore::new());
    (common::build_test_app(common::scenario(), store.clone()), store)
}

/// Starts a game and plays up to the choice.
async fn play_to_choice(app: &Router) -> serde_json::Value {
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    let (_, json) = post_empty(app.clone(), "/api/v1/game/advance").await;
    json
}

#[tokio::test]
async fn test_new_game_enters_first_scene() {
    // Arrange
    let (app, _) = app();

    // Act
    let (status, json) = post_empty(app, "/api/v1/game/new").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["frames"],
        json!([
            {"kind": "background", "image": "yomi_entrance"},
            {"kind": "bgm", "track": "tension"},
            {"kind": "narration", "text": "黄泉の入口。"}
        ])
    );
    let status_view = &json["status"];
    assert_eq!(status_view["state"]["phase"], "awaiting_advance");
    assert_eq!(status_view["cursor"], json!({"chapter": 0, "scene": 0, "line": 0}));
    assert_eq!(status_view["affection"], 50);
    assert_eq!(status_view["trust"], 50);
    assert_eq!(status_view["route"], "main");
    assert_eq!(status_view["flags"]["promise_made"], false);
    assert!(status_view["session_id"].is_string());
}

#[tokio::test]
async fn test_advance_shows_dialogue_with_sprite() {
    let (app, _) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_empty(app, "/api/v1/game/advance").await;

    assert_eq!(status, StatusCode::OK);
    let frame = &json["frames"][0];
    assert_eq!(frame["kind"], "dialogue");
    assert_eq!(frame["speaker"], "イザナミ");
    assert_eq!(frame["sprite"], "izanami_sad");
    assert_eq!(json["status"]["cursor"]["line"], 1);
}

#[tokio::test]
async fn test_choice_hides_options_whose_condition_fails() {
    let (app, _) = app();

    let json = play_to_choice(&app).await;

    assert_eq!(json["status"]["state"]["phase"], "awaiting_choice");
    assert_eq!(
        json["frames"],
        json!([{
            "kind": "choices",
            "prompt": "どうする？",
            "options": [
                {"display_index": 0, "original_index": 0, "text": "約束する"},
                {"display_index": 1, "original_index": 2, "text": "逃げる"}
            ]
        }])
    );
}

#[tokio::test]
async fn test_choose_applies_effects_and_continues() {
    // Arrange
    let (app, _) = app();
    play_to_choice(&app).await;

    // Act
    let (status, json) =
        post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 0})).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame_texts(&json), vec!["約束した。"]);
    assert_eq!(json["status"]["affection"], 60);
    assert_eq!(json["status"]["flags"]["promise_made"], true);
}

#[tokio::test]
async fn test_choose_records_original_index() {
    let (app, _) = app();
    play_to_choice(&app).await;

    post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 1})).await;
    let (_, json) = post_empty(app.clone(), "/api/v1/saves/quick").await;

    assert_eq!(json["gameState"]["choices"][0]["selected"], 2);
    assert_eq!(json["gameState"]["trust"], 40);
}

#[tokio::test]
async fn test_choose_while_awaiting_advance_is_conflict() {
    let (app, _) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_json(app, "/api/v1/game/choose", &json!({"index": 0})).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_signal");
}

#[tokio::test]
async fn test_out_of_range_choice_is_conflict() {
    let (app, _) = app();
    play_to_choice(&app).await;

    let (status, _) = post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 2})).await;
    let (_, game) = get_json(app, "/api/v1/game").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(game["status"]["state"]["phase"], "awaiting_choice");
}

#[tokio::test]
async fn test_advance_before_new_game_is_conflict() {
    let (app, _) = app();

    let (status, json) = post_empty(app, "/api/v1/game/advance").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_signal");
}

#[tokio::test]
async fn test_wait_line_resumes_after_timer() {
    // Arrange
    let (app, _) = app();
    play_to_choice(&app).await;
    post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 0})).await;

    // Act
    let (_, waiting) = post_empty(app.clone(), "/api/v1/game/advance").await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    let (_, frames) = get_json(app.clone(), "/api/v1/game/frames").await;
    let (_, again) = get_json(app.clone(), "/api/v1/game/frames").await;
    let (_, game) = get_json(app, "/api/v1/game").await;

    // Assert
    assert_eq!(waiting["status"]["state"]["phase"], "awaiting_timer");
    assert_eq!(waiting["status"]["state"]["duration_ms"], 20);
    assert_eq!(frame_texts(&frames), vec!["静寂。"]);
    assert_eq!(again["frames"], json!([]));
    assert_eq!(game["status"]["state"]["phase"], "awaiting_advance");
    assert_eq!(game["status"]["cursor"], json!({"chapter": 0, "scene": 1, "line": 1}));
}

#[tokio::test]
async fn test_advance_during_wait_is_conflict() {
    let (app, _) = app();
    play_to_choice(&app).await;
    post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 0})).await;
    post_empty(app.clone(), "/api/v1/game/advance").await;

    let (status, _) = post_empty(app, "/api/v1/game/advance").await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_entering_next_chapter_auto_saves() {
    // Arrange
    let (app, store) = app();
    play_to_choice(&app).await;
    post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 0})).await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(store.raw("save_slot_0").is_none());

    // Act
    let (status, json) = post_empty(app.clone(), "/api/v1/game/advance").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame_texts(&json), vec!["高天原。"]);
    assert_eq!(json["status"]["cursor"]["chapter"], 1);
    let saved: serde_json::Value =
        serde_json::from_str(&store.raw("save_slot_0").unwrap()).unwrap();
    assert_eq!(saved["currentChapter"], 1);
    assert_eq!(saved["gameState"]["affection"], 60);
}

#[tokio::test]
async fn test_jump_loads_chapter() {
    let (app, store) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_json(app, "/api/v1/game/jump", &json!({"chapter": 1})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame_texts(&json), vec!["高天原。"]);
    assert_eq!(json["status"]["cursor"], json!({"chapter": 1, "scene": 0, "line": 0}));
    assert!(store.raw("save_slot_0").is_none());
}

#[tokio::test]
async fn test_jump_past_chapter_table_is_conflict() {
    let (app, _) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_json(app, "/api/v1/game/jump", &json!({"chapter": 7})).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_signal");
}

#[tokio::test]
async fn test_mode_toggles_are_reported() {
    let (app, _) = app();

    let (_, skip) = post_json(app.clone(), "/api/v1/game/skip", &json!({"enabled": true})).await;
    let (_, auto) = post_json(app.clone(), "/api/v1/game/auto", &json!({"enabled": true})).await;
    let (_, off) = post_json(app, "/api/v1/game/skip", &json!({"enabled": false})).await;

    assert_eq!(skip["status"]["skip_mode"], true);
    assert_eq!(auto["auto_mode"], true);
    assert_eq!(off["status"]["skip_mode"], false);
    assert_eq!(off["status"]["auto_mode"], true);
}

#[tokio::test]
async fn test_switching_skip_on_advances_past_the_line_on_screen() {
    let (app, _) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_json(app, "/api/v1/game/skip", &json!({"enabled": true})).await;

    // The dialogue has never been shown, so skipping stops on it.
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame_texts(&json), vec!["待って。"]);
    assert_eq!(json["status"]["cursor"]["line"], 1);
    assert_eq!(json["status"]["state"]["phase"], "awaiting_advance");
}

#[tokio::test]
async fn test_status_includes_backlog() {
    let (app, _) = app();
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;

    let (status, json) = get_json(app, "/api/v1/game").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["backlog"],
        json!([
            {"speaker": "", "text": "黄泉の入口。"},
            {"speaker": "イザナミ", "text": "待って。"}
        ])
    );
}

#[tokio::test]
async fn test_unloadable_scenario_plays_fallback_line() {
    let app = common::build_test_app(
        Arc::new(FailingChapterSource),
        Arc::new(InMemoryKeyValueStore::new()),
    );

    let (status, json) = post_empty(app, "/api/v1/game/new").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"]["state"]["phase"], "awaiting_advance");
    assert_eq!(frame_texts(&json).len(), 1);
}
