//! FormPilot Core - session sync and autofill
//!
//! This crate ties the label resolver and the backend client together:
//! - Session: the (session id, user id, email) triple and its storage keys
//! - Storage: key/value stores standing in for page and extension storage
//! - Sync: snapshot reconciliation, polling and change-event watchers
//! - Messaging: typed cross-context messages with request/response timeouts
//! - Marker: the document-root attribute channel read by page scripts
//! - Content: per-page content-script state (trigger, focus, translation)
//! - Auth: login/logout plus the 401 policy for authenticated calls
//! - Assistant: resolve label, fetch answer, write it into the field

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod assistant;
pub mod auth;
pub mod content;
pub mod error;
pub mod marker;
pub mod messaging;
pub mod session;
pub mod storage;
pub mod sync;
pub mod tracker;
pub mod translation;

pub use assistant::{FieldAssistant, FilledField};
pub use auth::AuthFlow;
pub use content::{ContentScript, TRIGGER_ELEMENT_ID};
pub use error::{format_error_banner, Error, Result, UserFriendlyError};
pub use marker::PageMarker;
pub use messaging::{
    check_web_app_login, ExtensionMessage, MessageBus, MessageHandler, MessageResponse, Surface,
    SyncAgent,
};
pub use session::{keys, AuthState, Session};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageChange};
pub use sync::{SessionEvent, SessionSync, SyncConfig, SyncWatcher};
pub use tracker::UrlTracker;
pub use translation::{TranslationState, Translator};
