//! Save slot management.
//!
//! Every slot is independent: a corrupt slot shows up as such in the list
//! and fails its own load, but never stops the others from working.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use monogatari_core::clock::Clock;
use monogatari_core::error::EngineError;
use monogatari_core::storage::KeyValueStore;
use monogatari_engine::application::engine::EngineSnapshot;
use monogatari_scenario::domain::chapters::chapter_title;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::domain::save_record::SaveRecord;
use crate::domain::slot::SaveSlot;

/// Characters of on-screen text shown in a slot list.
pub const PREVIEW_CHARS: usize = 50;

const UNKNOWN_CHAPTER_TITLE: &str = "序章";

/// What a slot list shows for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    /// The slot.
    pub slot: SaveSlot,
    /// Its contents.
    #[serde(flatten)]
    pub entry: SlotEntry,
}

/// Contents of a slot as listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SlotEntry {
    /// Nothing saved.
    Empty,
    /// Data present but unreadable.
    Corrupt {
        /// Why it could not be read.
        reason: String,
    },
    /// A readable save.
    Saved {
        /// When it was written.
        timestamp: DateTime<Utc>,
        /// Cursor chapter index.
        chapter: usize,
        /// Chapter display title.
        chapter_title: String,
        /// Start of the on-screen text.
        preview: String,
    },
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let mut cut: String = text.chars().take(PREVIEW_CHARS).collect();
        cut.push_str("...");
        cut
    } else {
        text.to_owned()
    }
}

/// Reads and writes save records through a key-value store.
#[derive(Clone)]
pub struct SaveSlots {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for SaveSlots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SaveSlots").finish_non_exhaustive()
    }
}

impl SaveSlots {
    /// Creates a slot manager over `store`, stamping records with `clock`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Writes `snapshot` to `slot`, replacing whatever was there. Returns
    /// once the record is stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the store rejects the write.
    pub async fn save(
        &self,
        slot: SaveSlot,
        snapshot: &EngineSnapshot,
    ) -> Result<SaveRecord, EngineError> {
        let record = SaveRecord::capture(snapshot, self.clock.as_ref());
        self.store.set(&slot.storage_key(), record.encode()?).await?;
        info!(
            slot = slot.number(),
            chapter = record.current_chapter,
            scene = record.current_scene,
            line = record.current_line,
            "game saved"
        );
        Ok(record)
    }

    /// Reads the record in `slot`, or `None` if the slot is empty.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::CorruptSave` if the stored data is unreadable
    /// and `EngineError::Storage` if the store fails.
    pub async fn record(&self, slot: SaveSlot) -> Result<Option<SaveRecord>, EngineError> {
        match self.store.get(&slot.storage_key()).await? {
            Some(raw) => SaveRecord::decode(slot.number(), &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Reads `slot` back into a snapshot the engine can restore.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::EmptySlot` if nothing is saved there, plus the
    /// errors of [`SaveSlots::record`].
    pub async fn load(&self, slot: SaveSlot) -> Result<EngineSnapshot, EngineError> {
        let record = self
            .record(slot)
            .await?
            .ok_or(EngineError::EmptySlot(slot.number()))?;
        info!(slot = slot.number(), "save loaded");
        Ok(record.into_snapshot())
    }

    /// Clears `slot`.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the store fails.
    pub async fn delete(&self, slot: SaveSlot) -> Result<(), EngineError> {
        self.store.remove(&slot.storage_key()).await?;
        info!(slot = slot.number(), "save deleted");
        Ok(())
    }

    /// Saves to the auto-save slot.
    ///
    /// # Errors
    ///
    /// See [`SaveSlots::save`].
    pub async fn auto_save(&self, snapshot: &EngineSnapshot) -> Result<SaveRecord, EngineError> {
        self.save(SaveSlot::AUTO, snapshot).await
    }

    /// Saves to the quick-save slot.
    ///
    /// # Errors
    ///
    /// See [`SaveSlots::save`].
    pub async fn quick_save(&self, snapshot: &EngineSnapshot) -> Result<SaveRecord, EngineError> {
        self.save(SaveSlot::QUICK, snapshot).await
    }

    /// Loads the quick-save slot.
    ///
    /// # Errors
    ///
    /// See [`SaveSlots::load`].
    pub async fn quick_load(&self) -> Result<EngineSnapshot, EngineError> {
        self.load(SaveSlot::QUICK).await
    }

    /// Summarises every slot, auto-save first.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the store fails. Corrupt slots are
    /// listed, not returned as errors.
    pub async fn list(&self) -> Result<Vec<SlotSummary>, EngineError> {
        let mut summaries = Vec::new();
        for slot in SaveSlot::all() {
            let entry = match self.record(slot).await {
                Ok(None) => SlotEntry::Empty,
                Ok(Some(record)) => SlotEntry::Saved {
                    timestamp: record.timestamp,
                    chapter: record.current_chapter,
                    chapter_title: chapter_title(record.current_chapter)
                        .unwrap_or(UNKNOWN_CHAPTER_TITLE)
                        .to_owned(),
                    preview: preview(record.preview_text()),
                },
                Err(EngineError::CorruptSave { reason, .. }) => SlotEntry::Corrupt { reason },
                Err(e) => return Err(e),
            };
            summaries.push(SlotSummary { slot, entry });
        }
        Ok(summaries)
    }

    /// Bundles every readable slot into `{ "slot_<n>": record }`. Corrupt
    /// slots are left out.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the store fails.
    pub async fn export_all(&self) -> Result<Value, EngineError> {
        let mut bundle = Map::new();
        for slot in SaveSlot::all() {
            match self.record(slot).await {
                Ok(Some(record)) => {
                    let value = serde_json::to_value(&record).map_err(|e| {
                        EngineError::Storage(format!("save serialization failed: {e}"))
                    })?;
                    bundle.insert(slot.export_key(), value);
                }
                Ok(None) => {}
                Err(EngineError::CorruptSave { reason, .. }) => {
                    warn!(slot = slot.number(), %reason, "corrupt slot left out of export");
                }
                Err(e) => return Err(e),
            }
        }
        info!(slots = bundle.len(), "saves exported");
        Ok(Value::Object(bundle))
    }

    /// Writes every `slot_<n>` entry of an export bundle back to its slot.
    /// Keys that name no valid slot and entries that are not save records
    /// are skipped. Returns the slots written, in slot order.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidImport` if `bundle` is not a JSON
    /// object and `EngineError::Storage` if the store fails.
    pub async fn import_all(&self, bundle: &Value) -> Result<Vec<SaveSlot>, EngineError> {
        let Value::Object(entries) = bundle else {
            return Err(EngineError::InvalidImport(
                "expected an object keyed by slot".to_owned(),
            ));
        };

        let mut imported = Vec::new();
        for (key, value) in entries {
            let Some(slot) = SaveSlot::from_export_key(key) else {
                warn!(key = %key, "skipping unknown key in save bundle");
                continue;
            };
            if let Err(e) = serde_json::from_value::<SaveRecord>(value.clone()) {
                warn!(slot = slot.number(), error = %e, "skipping unreadable save in bundle");
                continue;
            }
            self.store.set(&slot.storage_key(), value.to_string()).await?;
            imported.push(slot);
        }
        imported.sort();
        info!(slots = imported.len(), "saves imported");
        Ok(imported)
    }
}
