//! Save records and their JSON codec.
//!
//! The layout matches what the browser build wrote to `localStorage`, so
//! records exported from it import unchanged:
//!
//! ```json
//! { "timestamp": "...", "gameState": {...}, "currentChapter": 0,
//!   "currentScene": 1, "currentLine": 2, "backlog": [...], "version": "1.0.0" }
//! ```

use chrono::{DateTime, Utc};
use monogatari_core::clock::Clock;
use monogatari_core::error::EngineError;
use monogatari_engine::application::engine::EngineSnapshot;
use monogatari_engine::domain::backlog::BacklogEntry;
use monogatari_engine::domain::cursor::PlaybackCursor;
use monogatari_engine::domain::state::GameState;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Version tag written into every record.
pub const SAVE_VERSION: &str = "1.0.0";

/// Backlog entries kept in a record.
pub const BACKLOG_TAIL: usize = 20;

/// One saved session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRecord {
    /// When the record was written.
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
    /// Persistent game state.
    pub game_state: GameState,
    /// Cursor chapter.
    pub current_chapter: usize,
    /// Cursor scene.
    pub current_scene: usize,
    /// Cursor line.
    pub current_line: usize,
    /// The most recent display history.
    #[serde(default)]
    pub backlog: Vec<BacklogEntry>,
    /// Text on screen when the record was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    /// Speaker on screen when the record was written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_name: Option<String>,
    /// Schema version.
    #[serde(default)]
    pub version: String,
}

impl SaveRecord {
    /// Builds a record from a live snapshot, stamped with `clock`.
    #[must_use]
    pub fn capture(snapshot: &EngineSnapshot, clock: &dyn Clock) -> Self {
        let skip = snapshot.backlog.len().saturating_sub(BACKLOG_TAIL);
        let last = snapshot.backlog.last();
        Self {
            timestamp: clock.now(),
            game_state: snapshot.state.clone(),
            current_chapter: snapshot.cursor.chapter(),
            current_scene: snapshot.cursor.scene(),
            current_line: snapshot.cursor.line(),
            backlog: snapshot.backlog[skip..].to_vec(),
            display_text: last.map(|entry| entry.text.clone()),
            speaker_name: last.map(|entry| entry.speaker.clone()),
            version: SAVE_VERSION.to_owned(),
        }
    }

    /// Turns the record back into a snapshot the engine can restore.
    #[must_use]
    pub fn into_snapshot(self) -> EngineSnapshot {
        EngineSnapshot {
            cursor: PlaybackCursor::at(
                self.current_chapter,
                self.current_scene,
                self.current_line,
            ),
            state: self.game_state,
            backlog: self.backlog,
        }
    }

    /// True if the record was written by this schema version.
    #[must_use]
    pub fn is_current_version(&self) -> bool {
        self.version == SAVE_VERSION
    }

    /// The text a slot list shows for this record: the on-screen text, or
    /// the latest backlog entry for records without one.
    #[must_use]
    pub fn preview_text(&self) -> &str {
        self.display_text
            .as_deref()
            .or_else(|| self.backlog.last().map(|entry| entry.text.as_str()))
            .unwrap_or_default()
    }

    /// Serializes the record to JSON.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if serialization fails.
    pub fn encode(&self) -> Result<String, EngineError> {
        serde_json::to_string(self)
            .map_err(|e| EngineError::Storage(format!("save serialization failed: {e}")))
    }

    /// Parses the record stored in `slot`. A record from another schema
    /// version is accepted with a warning.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::CorruptSave` if `raw` is not valid JSON or a
    /// required field is missing.
    pub fn decode(slot: u32, raw: &str) -> Result<Self, EngineError> {
        let record: Self = serde_json::from_str(raw).map_err(|e| EngineError::CorruptSave {
            slot,
            reason: e.to_string(),
        })?;
        if !record.is_current_version() {
            warn!(
                slot,
                version = %record.version,
                expected = SAVE_VERSION,
                "save version mismatch, loading best-effort"
            );
        }
        Ok(record)
    }
}
