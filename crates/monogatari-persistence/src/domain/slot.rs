//! Save slot numbering.

use std::fmt;

use monogatari_core::error::EngineError;
use serde::Serialize;

/// Highest slot number.
pub const MAX_SLOT: u32 = 20;

/// A validated save slot, `0..=MAX_SLOT`. Slot 0 holds the auto-save and
/// slot 1 the quick-save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SaveSlot(u32);

impl SaveSlot {
    /// The auto-save slot.
    pub const AUTO: Self = Self(0);
    /// The quick-save slot.
    pub const QUICK: Self = Self(1);

    /// Validates a slot number.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidSlot` if `number` exceeds `MAX_SLOT`.
    pub fn new(number: u32) -> Result<Self, EngineError> {
        if number > MAX_SLOT {
            return Err(EngineError::InvalidSlot(number));
        }
        Ok(Self(number))
    }

    /// Every slot, auto-save first.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..=MAX_SLOT).map(Self)
    }

    /// The slot number.
    #[must_use]
    pub const fn number(self) -> u32 {
        self.0
    }

    /// True for the auto-save and quick-save slots.
    #[must_use]
    pub const fn is_reserved(self) -> bool {
        self.0 <= 1
    }

    /// Storage key, `save_slot_<n>`.
    #[must_use]
    pub fn storage_key(self) -> String {
        format!("save_slot_{}", self.0)
    }

    /// Key inside an export bundle, `slot_<n>`.
    #[must_use]
    pub fn export_key(self) -> String {
        format!("slot_{}", self.0)
    }

    /// Parses an export bundle key. `None` for anything but `slot_<n>` with
    /// a valid `n`.
    #[must_use]
    pub fn from_export_key(key: &str) -> Option<Self> {
        key.strip_prefix("slot_")?
            .parse::<u32>()
            .ok()
            .and_then(|number| Self::new(number).ok())
    }
}

impl TryFrom<u32> for SaveSlot {
    type Error = EngineError;

    fn try_from(number: u32) -> Result<Self, Self::Error> {
        Self::new(number)
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_range() {
        assert!(SaveSlot::new(0).is_ok());
        assert!(SaveSlot::new(20).is_ok());
        assert_eq!(SaveSlot::new(21), Err(EngineError::InvalidSlot(21)));
        assert_eq!(SaveSlot::all().count(), 21);
    }

    #[test]
    fn test_keys() {
        let slot = SaveSlot::new(7).unwrap();

        assert_eq!(slot.storage_key(), "save_slot_7");
        assert_eq!(slot.export_key(), "slot_7");
        assert_eq!(SaveSlot::from_export_key("slot_7"), Some(slot));
    }

    #[test]
    fn test_bad_export_keys() {
        assert_eq!(SaveSlot::from_export_key("slot_99"), None);
        assert_eq!(SaveSlot::from_export_key("slot_x"), None);
        assert_eq!(SaveSlot::from_export_key("save_slot_2"), None);
    }

    #[test]
    fn test_reserved_slots() {
        assert!(SaveSlot::AUTO.is_reserved());
        assert!(SaveSlot::QUICK.is_reserved());
        assert!(!SaveSlot::new(2).unwrap().is_reserved());
    }
}
