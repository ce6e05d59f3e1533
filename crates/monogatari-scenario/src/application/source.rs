//! Chapter data sources.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use monogatari_core::error::EngineError;
use tracing::debug;

use crate::domain::document::ChapterDocument;

/// Where chapter documents come from.
#[async_trait]
pub trait ChapterSource: Send + Sync {
    /// Fetches and parses the document for `chapter`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::ChapterLoad` if the document is unreachable or
    /// malformed.
    async fn fetch(&self, chapter: &str) -> Result<ChapterDocument, EngineError>;
}

/// Reads `<root>/<chapter>.json`, falling back to `.yaml` and then `.yml`.
#[derive(Debug, Clone)]
pub struct DirectoryChapterSource {
    root: PathBuf,
}

impl DirectoryChapterSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory chapters are read from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn load_error(chapter: &str, reason: impl ToString) -> EngineError {
    EngineError::ChapterLoad {
        chapter: chapter.to_owned(),
        reason: reason.to_string(),
    }
}

#[async_trait]
impl ChapterSource for DirectoryChapterSource {
    async fn fetch(&self, chapter: &str) -> Result<ChapterDocument, EngineError> {
        if chapter.is_empty() || chapter.contains(['/', '\\', '.']) {
            return Err(load_error(chapter, "invalid chapter name"));
        }

        for extension in ["json", "yaml", "yml"] {
            let path = self.root.join(format!("{chapter}.{extension}"));
            let contents = match tokio::fs::read_to_string(&path).await {
                Ok(contents) => contents,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(load_error(chapter, e)),
            };
            debug!(chapter, path = %path.display(), "read chapter document");

            return if extension == "json" {
                ChapterDocument::from_json(&contents).map_err(|e| load_error(chapter, e))
            } else {
                ChapterDocument::from_yaml(&contents).map_err(|e| load_error(chapter, e))
            };
        }

        Err(load_error(
            chapter,
            format!("no document found under {}", self.root.display()),
        ))
    }
}
