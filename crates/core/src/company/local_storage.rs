//! File-based key/value storage
//!
//! Stores string values as a JSON object in a file on disk, the way a browser
//! keeps `localStorage` across reloads.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

use super::cache::{CompanyCache, COMPANY_ID_KEY};
use crate::{Error, Result};

/// Durable string key/value store backed by a JSON file
pub struct LocalStorage {
    /// Path to the JSON file
    path: PathBuf,
    /// In-memory copy of the stored entries
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalStorage {
    /// Open the store at `path`
    ///
    /// If the file doesn't exist, it will be created on first write.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = tokio::fs::read_to_string(&path).await?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::Storage(format!("Failed to parse {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.is_empty() {
            return Err(Error::InvalidInput("storage key must not be empty".into()));
        }
        let mut entries = self.entries.write().await;
        if entries.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries).await
    }

    /// Remove a key. Returns whether it was present.
    pub async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.persist(&entries).await?;
        Ok(true)
    }

    // Called with the write guard held so concurrent writers persist in order.
    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let content = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait]
impl CompanyCache for LocalStorage {
    async fn load(&self) -> Result<Option<String>> {
        Ok(self
            .get(COMPANY_ID_KEY)
            .await
            .filter(|id| !id.trim().is_empty()))
    }

    async fn store(&self, company_id: &str) -> Result<()> {
        if company_id.trim().is_empty() {
            return Err(Error::InvalidInput("company id must not be empty".into()));
        }
        self.set(COMPANY_ID_KEY, company_id).await
    }

    async fn clear(&self) -> Result<()> {
        self.remove(COMPANY_ID_KEY).await?;
        Ok(())
    }
}
