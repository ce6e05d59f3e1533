//! Player configuration storage.

use std::sync::Arc;

use monogatari_core::error::EngineError;
use monogatari_core::storage::KeyValueStore;
use tracing::{info, warn};

use crate::domain::config::{CONFIG_KEY, GameConfig};

/// Loads and stores [`GameConfig`] under its own key.
#[derive(Clone)]
pub struct ConfigStore {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore").finish_non_exhaustive()
    }
}

impl ConfigStore {
    /// Creates a config store over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the stored configuration, clamped. Missing or unreadable
    /// data yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if the store fails.
    pub async fn load(&self) -> Result<GameConfig, EngineError> {
        let Some(raw) = self.store.get(CONFIG_KEY).await? else {
            return Ok(GameConfig::default());
        };
        match serde_json::from_str::<GameConfig>(&raw) {
            Ok(config) => Ok(config.clamped()),
            Err(e) => {
                warn!(error = %e, "unreadable player config, using defaults");
                Ok(GameConfig::default())
            }
        }
    }

    /// Clamps and stores `config`, returning what was stored.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Storage` if serialization or the store fails.
    pub async fn save(&self, config: GameConfig) -> Result<GameConfig, EngineError> {
        let config = config.clamped();
        let raw = serde_json::to_string(&config)
            .map_err(|e| EngineError::Storage(format!("config serialization failed: {e}")))?;
        self.store.set(CONFIG_KEY, raw).await?;
        info!(
            text_speed = config.text_speed,
            auto_speed = config.auto_speed,
            "player config saved"
        );
        Ok(config)
    }
}
