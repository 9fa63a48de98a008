//! Storage key layout.
//!
//! Canonical keys are camelCase. Older builds of the web app wrote
//! snake_case keys (`session_id`, `user_id`, `user_email`); those are read as
//! fallbacks and cleared on logout but never written.

use crate::error::Result;
use crate::storage::KeyValueStore;

/// Session token
pub const SESSION_ID: &str = "sessionId";
/// Backend user id
pub const USER_ID: &str = "userId";
/// Account email
pub const EMAIL: &str = "email";
/// In-page translation toggle (`"true"` / `"false"`)
pub const TRANSLATION_ENABLED: &str = "translationEnabled";

/// Canonical key to legacy alias.
const LEGACY_ALIASES: [(&str, &str); 3] = [
    (SESSION_ID, "session_id"),
    (USER_ID, "user_id"),
    (EMAIL, "user_email"),
];

/// Canonical session keys.
pub const SESSION_KEYS: [&str; 3] = [SESSION_ID, USER_ID, EMAIL];

/// Legacy alias for a canonical key.
pub fn legacy_alias(key: &str) -> Option<&'static str> {
    LEGACY_ALIASES
        .iter()
        .find(|(canonical, _)| *canonical == key)
        .map(|(_, legacy)| *legacy)
}

/// Whether `key` (canonical or legacy) belongs to the session.
pub fn is_session_key(key: &str) -> bool {
    LEGACY_ALIASES
        .iter()
        .any(|(canonical, legacy)| *canonical == key || *legacy == key)
}

/// Read a canonical key, falling back to its legacy alias. Blank values count
/// as absent.
pub async fn read(store: &dyn KeyValueStore, key: &str) -> Result<Option<String>> {
    if let Some(value) = non_blank(store.get(key).await?) {
        return Ok(Some(value));
    }
    match legacy_alias(key) {
        Some(legacy) => Ok(non_blank(store.get(legacy).await?)),
        None => Ok(None),
    }
}

/// Remove a canonical key and its legacy alias.
pub async fn remove(store: &dyn KeyValueStore, key: &str) -> Result<()> {
    store.remove(key).await?;
    if let Some(legacy) = legacy_alias(key) {
        store.remove(legacy).await?;
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
