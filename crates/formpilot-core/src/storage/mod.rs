//! Storage - flat key/value stores
//!
//! Each execution context (web app page, extension, popup) owns one store.
//! Values are strings, the way browser storage holds them. Writes are
//! single-key and atomic; there are no transactions.
//!
//! Stores that can observe their own writes expose a change feed through
//! [`KeyValueStore::subscribe`]; the others are picked up by polling.

/// JSON-file store shared across processes
pub mod file;
/// In-process store
pub mod memory;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A single key changing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageChange {
    /// Key that changed
    pub key: String,
    /// New value, `None` when removed
    pub new_value: Option<String>,
}

/// Flat key/value store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a key.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a key.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Delete every key.
    async fn clear(&self) -> Result<()>;

    /// Native change notifications, if this store supports them.
    fn subscribe(&self) -> Option<broadcast::Receiver<StorageChange>> {
        None
    }
}

#[cfg(test)]
mod tests;
