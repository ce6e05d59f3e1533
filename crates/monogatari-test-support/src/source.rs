//! Test chapter sources — documents held in memory.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use monogatari_core::error::EngineError;
use monogatari_scenario::application::source::ChapterSource;
use monogatari_scenario::domain::document::ChapterDocument;

/// A chapter source serving fixed documents and counting fetches per
/// chapter. Unknown chapters fail with `ChapterLoad`.
#[derive(Debug, Default)]
pub struct StaticChapterSource {
    documents: HashMap<String, ChapterDocument>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl StaticChapterSource {
    /// Create a source with no chapters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds chapter `name` parsed from a JSON document.
    ///
    /// # Panics
    ///
    /// Panics if `json` is not a valid chapter document.
    #[must_use]
    pub fn with_json(mut self, name: &str, json: &str) -> Self {
        let document = ChapterDocument::from_json(json)
            .unwrap_or_else(|e| panic!("invalid test document for {name}: {e}"));
        self.documents.insert(name.to_owned(), document);
        self
    }

    /// Adds chapter `name`.
    #[must_use]
    pub fn with_document(mut self, name: &str, document: ChapterDocument) -> Self {
        self.documents.insert(name.to_owned(), document);
        self
    }

    /// How many times `name` has been fetched.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn fetch_count(&self, name: &str) -> usize {
        self.fetches.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

#[async_trait]
impl ChapterSource for StaticChapterSource {
    async fn fetch(&self, chapter: &str) -> Result<ChapterDocument, EngineError> {
        *self
            .fetches
            .lock()
            .unwrap()
            .entry(chapter.to_owned())
            .or_default() += 1;
        self.documents
            .get(chapter)
            .cloned()
            .ok_or_else(|| EngineError::ChapterLoad {
                chapter: chapter.to_owned(),
                reason: "not found".to_owned(),
            })
    }
}

/// A chapter source that is always unreachable.
#[derive(Debug)]
pub struct FailingChapterSource;

#[async_trait]
impl ChapterSource for FailingChapterSource {
    async fn fetch(&self, chapter: &str) -> Result<ChapterDocument, EngineError> {
        Err(EngineError::ChapterLoad {
            chapter: chapter.to_owned(),
            reason: "connection refused".to_owned(),
        })
    }
}
