//! Scenario store — lazy, cached chapter loading.
//!
//! A chapter is fetched and compiled the first time it is asked for and the
//! result is kept for the life of the store. A chapter that cannot be loaded
//! is replaced by [`Chapter::fallback`] so playback always has something to
//! walk; the failure goes to the error reporter and the fallback is not
//! cached, so a later request tries the source again.

use std::collections::HashMap;
use std::sync::Arc;

use monogatari_core::report::ErrorReporter;
use tracing::{info, warn};

use crate::application::source::ChapterSource;
use crate::domain::model::{Chapter, Line};

/// Holds every chapter loaded so far, keyed by chapter name.
pub struct ScenarioStore {
    source: Arc<dyn ChapterSource>,
    reporter: Arc<dyn ErrorReporter>,
    cache: HashMap<String, Arc<Chapter>>,
}

impl std::fmt::Debug for ScenarioStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScenarioStore")
            .field("cached", &self.cache.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl ScenarioStore {
    /// Creates an empty store over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ChapterSource>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            source,
            reporter,
            cache: HashMap::new(),
        }
    }

    /// Returns chapter `name`, fetching it on first use.
    ///
    /// Never fails: a missing or malformed chapter is reported and replaced
    /// by a one-line fallback.
    pub async fn load_chapter(&mut self, name: &str) -> Arc<Chapter> {
        if let Some(chapter) = self.cache.get(name) {
            return Arc::clone(chapter);
        }

        let compiled = match self.source.fetch(name).await {
            Ok(document) => document.compile(name),
            Err(e) => Err(e),
        };

        match compiled {
            Ok(compiled) => {
                for diagnostic in &compiled.diagnostics {
                    warn!(chapter = name, error = %diagnostic, "chapter compiled with warnings");
                    self.reporter.report(diagnostic);
                }
                info!(
                    chapter = name,
                    scenes = compiled.chapter.scenes.len(),
                    "chapter loaded"
                );
                let chapter = Arc::new(compiled.chapter);
                self.cache.insert(name.to_owned(), Arc::clone(&chapter));
                chapter
            }
            Err(e) => {
                self.reporter.report(&e);
                Arc::new(Chapter::fallback(name))
            }
        }
    }

    /// Returns chapter `name` if it has already been loaded.
    #[must_use]
    pub fn cached(&self, name: &str) -> Option<Arc<Chapter>> {
        self.cache.get(name).cloned()
    }

    /// Looks up a line in an already-loaded chapter. Returns `None` for an
    /// unloaded chapter or an out-of-range coordinate.
    #[must_use]
    pub fn get_line(&self, chapter: &str, scene: usize, line: usize) -> Option<&Line> {
        self.cache.get(chapter)?.line(scene, line)
    }

    /// Finds a scene by id in an already-loaded chapter.
    #[must_use]
    pub fn find_scene_index(&self, chapter: &str, scene_id: &str) -> Option<usize> {
        self.cache.get(chapter)?.find_scene_index(scene_id)
    }
}
