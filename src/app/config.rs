//! Application configuration types

use std::path::PathBuf;

use formpilot_api::ApiConfig;
use formpilot_core::{FileStore, SyncConfig};
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Where the file-backed store lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage file; empty means `~/.formpilot/storage.json`
    #[serde(default)]
    pub path: String,
}

impl StorageConfig {
    /// Configured path, or the default location.
    pub fn resolve_path(&self) -> PathBuf {
        if self.path.trim().is_empty() {
            FileStore::default_path()
        } else {
            PathBuf::from(self.path.trim())
        }
    }
}
