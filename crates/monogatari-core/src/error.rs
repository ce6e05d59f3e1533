//! Engine error taxonomy.
//!
//! Only [`EngineError::InvalidSignal`], [`EngineError::InvalidSlot`],
//! [`EngineError::EmptySlot`], [`EngineError::CorruptSave`],
//! [`EngineError::InvalidImport`] and [`EngineError::Storage`] ever reach a
//! caller. The remaining kinds are
//! recovered where they occur and only travel as far as the
//! [`ErrorReporter`](crate::report::ErrorReporter) and the log.

use thiserror::Error;

/// Top-level error type shared by every engine crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A chapter document could not be fetched or parsed. Recovered by
    /// substituting a fallback chapter.
    #[error("failed to load chapter '{chapter}': {reason}")]
    ChapterLoad {
        /// The chapter name that was requested.
        chapter: String,
        /// What went wrong.
        reason: String,
    },

    /// A save slot holds data that cannot be turned back into a session.
    #[error("save slot {slot} is unusable: {reason}")]
    CorruptSave {
        /// The slot that was read.
        slot: u32,
        /// What went wrong.
        reason: String,
    },

    /// A `next` or `scene_change` target matched neither a chapter name nor
    /// a scene in the current chapter. Recovered by advancing to the next
    /// scene.
    #[error("scene target '{target}' not found in chapter '{chapter}'")]
    UnresolvedSceneTarget {
        /// The target name as authored.
        target: String,
        /// The chapter the jump was attempted from.
        chapter: String,
    },

    /// A choice condition matched no supported form. Recovered by treating
    /// it as true.
    #[error("malformed condition: {0}")]
    MalformedCondition(String),

    /// A signal arrived that does not fit the engine's current suspension.
    #[error("invalid signal: {0}")]
    InvalidSignal(String),

    /// A slot number outside the supported range.
    #[error("invalid save slot: {0}")]
    InvalidSlot(u32),

    /// A slot that holds no save.
    #[error("save slot {0} is empty")]
    EmptySlot(u32),

    /// A save bundle handed to import is not a JSON object of slots.
    #[error("invalid save bundle: {0}")]
    InvalidImport(String),

    /// A storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(String),
}
