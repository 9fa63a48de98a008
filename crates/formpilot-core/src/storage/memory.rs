use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};
use tracing::trace;

use super::{KeyValueStore, StorageChange};
use crate::error::Result;

/// In-memory store with an optional change feed.
///
/// With notifications on it behaves like extension storage (listeners fire
/// on every write); without, like page storage seen from another context,
/// where changes are only discovered by polling.
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    changes: Option<broadcast::Sender<StorageChange>>,
}

impl MemoryStore {
    /// Store that publishes a [`StorageChange`] on every write.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(64);
        Self {
            values: RwLock::new(HashMap::new()),
            changes: Some(sender),
        }
    }

    /// Store without a change feed.
    #[must_use]
    pub fn without_notifications() -> Self {
        Self {
            values: RwLock::new(HashMap::new()),
            changes: None,
        }
    }

    /// Number of keys held.
    pub async fn len(&self) -> usize {
        self.values.read().await.len()
    }

    /// Whether the store is empty.
    pub async fn is_empty(&self) -> bool {
        self.values.read().await.is_empty()
    }

    fn notify(&self, key: &str, new_value: Option<String>) {
        if let Some(sender) = &self.changes {
            trace!(key = %key, "Publishing storage change");
            // No listeners is fine
            let _ = sender.send(StorageChange {
                key: key.to_string(),
                new_value,
            });
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        self.notify(key, Some(value.to_string()));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let removed = self.values.write().await.remove(key);
        if removed.is_some() {
            self.notify(key, None);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let removed: Vec<String> = self.values.write().await.drain().map(|(k, _)| k).collect();
        for key in &removed {
            self.notify(key, None);
        }
        Ok(())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<StorageChange>> {
        self.changes.as_ref().map(broadcast::Sender::subscribe)
    }
}
