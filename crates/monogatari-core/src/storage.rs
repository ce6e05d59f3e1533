//! Key-value storage abstraction.
//!
//! Saves live under `save_slot_<n>` keys and player configuration under its
//! own key. Implementations decide where the strings actually go.

use async_trait::async_trait;

use crate::error::EngineError;

/// A string-to-string store, the only persistence primitive the engine needs.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, EngineError>;

    /// Stores `value` under `key`, replacing any previous value. Must not
    /// return before the value is durable.
    async fn set(&self, key: &str, value: String) -> Result<(), EngineError>;

    /// Removes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), EngineError>;
}
