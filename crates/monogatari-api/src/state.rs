//! Shared application state.

use std::sync::Arc;

use monogatari_core::clock::Clock;
use monogatari_core::report::ErrorReporter;
use monogatari_core::storage::KeyValueStore;
use monogatari_engine::application::engine::Engine;
use monogatari_persistence::application::config_store::ConfigStore;
use monogatari_persistence::application::slots::SaveSlots;
use monogatari_scenario::application::source::ChapterSource;
use monogatari_scenario::application::store::ScenarioStore;
use tokio::sync::Mutex;

use crate::frames::FrameBuffer;

/// Application state shared across all request handlers.
///
/// There is exactly one engine session; handlers and timer tasks take turns
/// on it through the mutex, so scenario logic never runs concurrently.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The live session.
    pub engine: Arc<Mutex<Engine>>,
    /// Frames the engine has emitted and the client has not collected yet.
    pub frames: Arc<FrameBuffer>,
    /// Save slot manager.
    pub saves: SaveSlots,
    /// Player configuration.
    pub config: ConfigStore,
}

impl AppState {
    /// Wires an idle engine and the persistence services over the given
    /// collaborators.
    #[must_use]
    pub fn new(
        source: Arc<dyn ChapterSource>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let frames = Arc::new(FrameBuffer::new());
        let engine = Engine::new(
            ScenarioStore::new(source, Arc::clone(&reporter)),
            frames.clone(),
            frames.clone(),
            reporter,
        );
        Self {
            engine: Arc::new(Mutex::new(engine)),
            frames,
            saves: SaveSlots::new(Arc::clone(&store), clock),
            config: ConfigStore::new(store),
        }
    }
}
