//! Persistence seam for the session pair.
//!
//! The vault is a plain key/value store holding two string keys: the raw
//! bearer credential and the serialized identity. [`FileVault`] survives
//! process restarts; [`MemoryVault`] backs tests and ephemeral sessions.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::persist::PersistError;

#[async_trait]
pub trait SessionVault: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError>;
    async fn clear(&self, key: &str) -> Result<(), PersistError>;
}

/// File-backed vault storing all keys in a single JSON map.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact for the next
/// hydration.
pub struct FileVault {
    path: PathBuf,
}

impl FileVault {
    /// Creates a vault persisting into `<dir>/session.json`. The
    /// directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join("session.json"),
        }
    }

    async fn load(&self) -> Result<HashMap<String, String>, PersistError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn store(&self, entries: &HashMap<String, String>) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let contents = serde_json::to_string(entries)?;
        tokio::fs::write(&tmp_path, contents).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        Ok(())
    }
}

#[async_trait]
impl SessionVault for FileVault {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self.load().await?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries).await
    }

    async fn clear(&self, key: &str) -> Result<(), PersistError> {
        let mut entries = self.load().await?;
        if entries.remove(key).is_some() {
            self.store(&entries).await?;
        }

        Ok(())
    }
}

/// In-memory vault; nothing survives the process.
#[derive(Default)]
pub struct MemoryVault {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionVault for MemoryVault {
    async fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), PersistError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn clear(&self, key: &str) -> Result<(), PersistError> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}
