//! Filesystem implementation of the `KeyValueStore` trait.
//!
//! One file per key, `<root>/<key>.json`. Writes go to a temporary file
//! first and are renamed into place, so a crash mid-write leaves the
//! previous value intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use monogatari_core::error::EngineError;
use monogatari_core::storage::KeyValueStore;
use tracing::debug;

/// Directory-backed key-value store.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Creates a store rooted at `root`. The directory is created on first
    /// write.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory values are written to.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf, EngineError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(EngineError::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

fn storage_error(action: &str, path: &Path, e: &std::io::Error) -> EngineError {
    EngineError::Storage(format!("{action} {} failed: {e}", path.display()))
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        let path = self.path(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(storage_error("read", &path, &e)),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), EngineError> {
        let path = self.path(key)?;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| storage_error("create", &self.root, &e))?;

        let staging = path.with_extension("json.tmp");
        tokio::fs::write(&staging, value)
            .await
            .map_err(|e| storage_error("write", &staging, &e))?;
        tokio::fs::rename(&staging, &path)
            .await
            .map_err(|e| storage_error("rename", &path, &e))?;
        debug!(key, path = %path.display(), "value stored");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), EngineError> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &path, &e)),
        }
    }
}
