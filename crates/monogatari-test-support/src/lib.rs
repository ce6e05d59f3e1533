//! Shared test doubles for the Monogatari engine.

mod clock;
mod reporter;
mod sinks;
mod source;
mod storage;

pub use clock::FixedClock;
pub use reporter::RecordingErrorReporter;
pub use sinks::{EffectsCall, PresentationCall, RecordingEffects, RecordingPresentation};
pub use source::{FailingChapterSource, StaticChapterSource};
pub use storage::{FailingKeyValueStore, InMemoryKeyValueStore};
