//! Integration tests for the save slot routes.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use monogatari_test_support::{FailingKeyValueStore, InMemoryKeyValueStore};
use serde_json::json;

use common::{delete, frame_texts, get_json, post_empty, post_json};

fn app_with(store: Arc<InMemoryKeyValueStore>) -> Router {
    common::build_test_app(common::scenario(), store)
}

fn app() -> Router {
    app_with(Arc::new(InMemoryKeyValueStore::new()))
}

#[tokio::test]
async fn test_save_then_list_shows_summary() {
    // Arrange
    let app = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    // Act
    let (save_status, record) = post_empty(app.clone(), "/api/v1/saves/3").await;
    let (list_status, list) = get_json(app, "/api/v1/saves").await;

    // Assert
    assert_eq!(save_status, StatusCode::OK);
    assert_eq!(record["currentChapter"], 0);
    assert_eq!(record["version"], "1.0.0");
    assert_eq!(record["timestamp"], "2026-01-15T10:00:00Z");

    assert_eq!(list_status, StatusCode::OK);
    let slots = list.as_array().unwrap();
    assert_eq!(slots.len(), 21);
    assert_eq!(slots[0], json!({"slot": 0, "status": "empty"}));
    assert_eq!(slots[3]["status"], "saved");
    assert_eq!(slots[3]["chapter_title"], "序章：運命の逃走");
    assert_eq!(slots[3]["preview"], "黄泉の入口。");
}

#[tokio::test]
async fn test_load_restores_saved_position() {
    // Arrange
    let app = app();
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/saves/2").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;

    // Act
    let (status, json) = post_empty(app, "/api/v1/saves/2/load").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"]["cursor"], json!({"chapter": 0, "scene": 0, "line": 0}));
    assert_eq!(json["status"]["state"]["phase"], "awaiting_advance");
    assert!(frame_texts(&json).contains(&"黄泉の入口。".to_owned()));
}

#[tokio::test]
async fn test_load_drops_uncollected_timer_frames() {
    // Arrange
    let app = app();
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/saves/2").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    post_json(app.clone(), "/api/v1/game/choose", &json!({"index": 0})).await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    tokio::time::sleep(Duration::from_millis(200)).await;

    // Act
    let (status, loaded) = post_empty(app.clone(), "/api/v1/saves/2/load").await;
    let (_, leftover) = get_json(app, "/api/v1/game/frames").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(frame_texts(&loaded), vec!["黄泉の入口。"]);
    assert_eq!(leftover["frames"], json!([]));
}

#[tokio::test]
async fn test_load_starts_a_new_session() {
    let app = app();
    let (_, started) = post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/saves/2").await;

    let (_, loaded) = post_empty(app, "/api/v1/saves/2/load").await;

    assert_ne!(
        started["status"]["session_id"],
        loaded["status"]["session_id"]
    );
}

#[tokio::test]
async fn test_slot_out_of_range_is_bad_request() {
    let app = app();
    post_empty(app.clone(), "/api/v1/game/new").await;

    let (status, json) = post_empty(app, "/api/v1/saves/21").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_slot");
}

#[tokio::test]
async fn test_loading_empty_slot_is_not_found() {
    let app = app();

    let (status, json) = post_empty(app, "/api/v1/saves/5/load").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "empty_slot");
}

#[tokio::test]
async fn test_corrupt_slot_is_listed_and_fails_only_its_own_load() {
    // Arrange
    let store = Arc::new(InMemoryKeyValueStore::with_entries([(
        "save_slot_4",
        "{not json",
    )]));
    let app = app_with(store);
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/saves/2").await;

    // Act
    let (load_status, load) = post_empty(app.clone(), "/api/v1/saves/4/load").await;
    let (_, list) = get_json(app.clone(), "/api/v1/saves").await;
    let (other_status, _) = post_empty(app, "/api/v1/saves/2/load").await;

    // Assert
    assert_eq!(load_status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(load["error"], "corrupt_save");
    assert_eq!(list[4]["status"], "corrupt");
    assert_eq!(list[2]["status"], "saved");
    assert_eq!(other_status, StatusCode::OK);
}

#[tokio::test]
async fn test_delete_clears_slot() {
    let app = app();
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/saves/6").await;

    let status = delete(app.clone(), "/api/v1/saves/6").await;
    let (load_status, _) = post_empty(app, "/api/v1/saves/6/load").await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(load_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_saving_without_a_game_is_conflict() {
    let app = app();

    let (status, _) = post_empty(app, "/api/v1/saves/2").await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_quick_save_and_quick_load_use_slot_one() {
    // Arrange
    let store = Arc::new(InMemoryKeyValueStore::new());
    let app = app_with(store.clone());
    post_empty(app.clone(), "/api/v1/game/new").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;

    // Act
    let (save_status, _) = post_empty(app.clone(), "/api/v1/saves/quick").await;
    post_empty(app.clone(), "/api/v1/game/advance").await;
    let (load_status, loaded) = post_empty(app, "/api/v1/saves/quick/load").await;

    // Assert
    assert_eq!(save_status, StatusCode::OK);
    assert!(store.raw("save_slot_1").is_some());
    assert_eq!(load_status, StatusCode::OK);
    assert_eq!(loaded["status"]["cursor"]["line"], 1);
}

#[tokio::test]
async fn test_export_then_import_into_fresh_store() {
    // Arrange
    let source = app();
    post_empty(source.clone(), "/api/v1/game/new").await;
    post_empty(source.clone(), "/api/v1/saves/2").await;
    post_empty(source.clone(), "/api/v1/saves/7").await;
    let (_, bundle) = get_json(source, "/api/v1/saves/export").await;

    let target_store = Arc::new(InMemoryKeyValueStore::new());
    let target = app_with(target_store.clone());

    // Act
    let (status, json) = post_json(target, "/api/v1/saves/import", &bundle).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["imported"], json!([2, 7]));
    assert_eq!(target_store.keys(), vec!["save_slot_2", "save_slot_7"]);
}

#[tokio::test]
async fn test_import_skips_unknown_keys() {
    let app = app();
    let bundle = json!({"slot_99": {}, "theme": "dark"});

    let (status, json) = post_json(app, "/api/v1/saves/import", &bundle).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["imported"], json!([]));
}

#[tokio::test]
async fn test_import_of_non_object_is_bad_request() {
    let app = app();

    let (status, json) = post_json(app, "/api/v1/saves/import", &json!([1, 2, 3])).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "invalid_import");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = common::build_test_app(common::scenario(), Arc::new(FailingKeyValueStore));

    let (status, json) = get_json(app, "/api/v1/saves").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "storage_error");
}
