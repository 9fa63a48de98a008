//! Sync - keeping each context's view of the session current
//!
//! Every context owns a [`SessionSync`] over its store. One reconciliation
//! function compares a fresh snapshot with the last one seen and publishes a
//! [`SessionEvent`] when they differ; [`SyncWatcher`] calls it on a timer and
//! on native storage-change events.
//!
//! There is no authoritative context and no versioning: whichever write a
//! context observes last is what that context believes.

/// Poll and timeout settings
pub mod config;
/// Snapshot reconciliation and session events
pub mod session_sync;
/// Timer and change-feed driven reconciliation
pub mod watcher;

pub use config::SyncConfig;
pub use session_sync::{SessionEvent, SessionSync};
pub use watcher::{SyncWatcher, MIN_POLL_INTERVAL};
