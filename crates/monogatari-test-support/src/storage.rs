//! Test key-value stores.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use monogatari_core::error::EngineError;
use monogatari_core::storage::KeyValueStore;

/// A key-value store backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `entries`.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.to_owned(), value.to_owned()))
                    .collect(),
            ),
        }
    }

    /// Returns a snapshot of every stored key, sorted.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().unwrap().keys().cloned().collect()
    }

    /// Returns the raw value under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), EngineError> {
        self.entries.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), EngineError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

/// A key-value store that fails every operation. Useful for testing
/// error-handling paths.
#[derive(Debug)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, EngineError> {
        Err(EngineError::Storage("disk unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), EngineError> {
        Err(EngineError::Storage("disk unavailable".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), EngineError> {
        Err(EngineError::Storage("disk unavailable".into()))
    }
}
