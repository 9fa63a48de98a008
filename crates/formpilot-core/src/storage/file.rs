use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::KeyValueStore;
use crate::error::{Error, Result};

/// File name used under the data directory
pub const STORAGE_FILE_NAME: &str = "storage.json";

/// JSON-file store shared between processes.
///
/// Every read goes to disk, so writes made by another process are visible on
/// the next poll. There is no change feed.
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Store backed by `path` (created on first write).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// `~/.formpilot/storage.json`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".formpilot")
            .join(STORAGE_FILE_NAME)
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(Error::Storage(format!("read {}: {}", self.path.display(), e))),
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            warn!(path = %self.path.display(), error = %e, "Storage file is corrupt");
            Error::Storage(format!("parse {}: {}", self.path.display(), e))
        })
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::Storage(format!("create {}: {}", parent.display(), e)))?;
        }
        let content = serde_json::to_string_pretty(values)
            .map_err(|e| Error::Storage(e.to_string()))?;

        // Rename is atomic, so readers never see a half-written file. Each
        // write gets its own temp file; other instances may share the path.
        let tmp = self
            .path
            .with_extension(format!("json.{}.tmp", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, content)
            .await
            .map_err(|e| Error::Storage(format!("write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| Error::Storage(format!("rename {}: {}", self.path.display(), e)))?;
        debug!(path = %self.path.display(), keys = values.len(), "Storage file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_some() {
            self.write_all(&values).await?;
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        if !self.read_all().await?.is_empty() {
            self.write_all(&BTreeMap::new()).await?;
        }
        Ok(())
    }
}
