//! App - configuration and per-context wiring for the CLI
//!
//! The CLI plays one extension context per invocation. Every context shares
//! the file-backed store, so a login in one terminal is picked up by a
//! `watch` running in another.

pub mod config;
pub mod loader;

use std::sync::Arc;

use anyhow::{Context, Result};
use formpilot_api::ApiClient;
use formpilot_core::{AuthFlow, FileStore, KeyValueStore, SessionSync};
use tracing::debug;

pub use config::AppConfig;
pub use loader::load_config;

/// Store, session view and backend client for one context.
pub struct App {
    pub config: AppConfig,
    pub sync: Arc<SessionSync>,
    pub auth: Arc<AuthFlow>,
}

impl App {
    /// Wire `context` over the configured storage file.
    pub fn new(config: AppConfig, context: &str) -> Result<Self> {
        let path = config.storage.resolve_path();
        debug!(path = %path.display(), context, "Opening storage");
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(path));
        Self::with_store(config, context, store)
    }

    /// Wire `context` over an existing store.
    pub fn with_store(config: AppConfig, context: &str, store: Arc<dyn KeyValueStore>) -> Result<Self> {
        let api = ApiClient::new(config.api.clone()).context("Failed to create API client")?;
        let sync = Arc::new(SessionSync::new(context, store));
        let auth = Arc::new(AuthFlow::new(api, sync.clone()));
        Ok(Self { config, sync, auth })
    }
}
