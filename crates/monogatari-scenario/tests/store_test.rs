//! Scenario store tests over in-memory chapter sources.

use std::sync::Arc;

use monogatari_core::error::EngineError;
use monogatari_scenario::application::store::ScenarioStore;
use monogatari_scenario::domain::model::Line;
use monogatari_test_support::{FailingChapterSource, RecordingErrorReporter, StaticChapterSource};

const CHAPTER1: &str = r#"{
    "title": "第1章：高天原での出会い",
    "scenes": [
        { "id": "scene1-1", "lines": [ { "type": "narration", "text": "高天原。" } ] },
        { "id": "scene1-2", "lines": [
            { "type": "choice", "options": [
                { "text": "話しかける", "condition": "affection >>= 3" }
            ] }
        ] }
    ]
}"#;

#[tokio::test]
async fn test_load_chapter_fetches_once() {
    // Arrange
    let source = Arc::new(StaticChapterSource::new().with_json("chapter1", CHAPTER1));
    let reporter = Arc::new(RecordingErrorReporter::new());
    let mut store = ScenarioStore::new(source.clone(), reporter);

    // Act
    let first = store.load_chapter("chapter1").await;
    let second = store.load_chapter("chapter1").await;

    // Assert
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(source.fetch_count("chapter1"), 1);
}

#[tokio::test]
async fn test_line_and_scene_lookup_after_load() {
    // Arrange
    let source = Arc::new(StaticChapterSource::new().with_json("chapter1", CHAPTER1));
    let mut store = ScenarioStore::new(source, Arc::new(RecordingErrorReporter::new()));
    assert!(store.get_line("chapter1", 0, 0).is_none());

    // Act
    store.load_chapter("chapter1").await;

    // Assert
    assert_eq!(
        store.get_line("chapter1", 0, 0),
        Some(&Line::Narration {
            text: "高天原。".to_owned()
        })
    );
    assert!(store.get_line("chapter1", 0, 1).is_none());
    assert_eq!(store.find_scene_index("chapter1", "scene1-2"), Some(1));
    assert_eq!(store.find_scene_index("chapter1", "scene9-9"), None);
    assert!(store.cached("chapter1").is_some());
}

#[tokio::test]
async fn test_malformed_conditions_are_reported_on_load() {
    let source = Arc::new(StaticChapterSource::new().with_json("chapter1", CHAPTER1));
    let reporter = Arc::new(RecordingErrorReporter::new());
    let mut store = ScenarioStore::new(source, reporter.clone());

    store.load_chapter("chapter1").await;

    assert_eq!(
        reporter.reported(),
        vec![EngineError::MalformedCondition("affection >>= 3".to_owned())]
    );
}

#[tokio::test]
async fn test_unreachable_chapter_is_replaced_and_reported() {
    // Arrange
    let reporter = Arc::new(RecordingErrorReporter::new());
    let mut store = ScenarioStore::new(Arc::new(FailingChapterSource), reporter.clone());

    // Act
    let chapter = store.load_chapter("chapter5").await;

    // Assert
    assert!(chapter.is_fallback);
    assert_eq!(chapter.scenes.len(), 1);
    assert_eq!(
        chapter.line(0, 0),
        Some(&Line::Narration {
            text: "第5章：黄泉の国".to_owned()
        })
    );
    assert!(matches!(
        reporter.reported().as_slice(),
        [EngineError::ChapterLoad { chapter, .. }] if chapter == "chapter5"
    ));
}

#[tokio::test]
async fn test_fallback_is_not_cached() {
    // Arrange
    let source = Arc::new(StaticChapterSource::new());
    let reporter = Arc::new(RecordingErrorReporter::new());
    let mut store = ScenarioStore::new(source.clone(), reporter.clone());

    // Act
    store.load_chapter("chapter2").await;
    store.load_chapter("chapter2").await;

    // Assert
    assert_eq!(source.fetch_count("chapter2"), 2);
    assert_eq!(reporter.reported().len(), 2);
    assert!(store.cached("chapter2").is_none());
}

#[tokio::test]
async fn test_empty_document_falls_back() {
    let source = Arc::new(StaticChapterSource::new().with_json("chapter3", r#"{"scenes":[]}"#));
    let reporter = Arc::new(RecordingErrorReporter::new());
    let mut store = ScenarioStore::new(source, reporter.clone());

    let chapter = store.load_chapter("chapter3").await;

    assert!(chapter.is_fallback);
    assert_eq!(reporter.reported().len(), 1);
}
