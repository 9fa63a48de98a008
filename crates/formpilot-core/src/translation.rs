//! In-page translation: the persisted toggle and the backend call.

use std::sync::Arc;

use formpilot_api::{TranslateRequest, TranslateResponse};
use tracing::{debug, warn};

use crate::auth::AuthFlow;
use crate::error::Result;
use crate::session::keys;
use crate::storage::KeyValueStore;

/// The `translationEnabled` flag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationState {
    /// Whether translation is on
    pub enabled: bool,
}

impl TranslationState {
    /// Read the flag; a missing key or storage failure reads as off.
    pub async fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(keys::TRANSLATION_ENABLED).await {
            Ok(value) => Self {
                enabled: value.as_deref() == Some("true"),
            },
            Err(e) => {
                warn!(error = %e, "Translation flag read failed");
                Self::default()
            }
        }
    }

    /// Persist the flag.
    pub async fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        let value = if self.enabled { "true" } else { "false" };
        store.set(keys::TRANSLATION_ENABLED, value).await?;
        debug!(enabled = self.enabled, "Translation flag saved");
        Ok(())
    }
}

/// Authenticated text translation.
pub struct Translator {
    auth: Arc<AuthFlow>,
}

impl Translator {
    /// Create a translator using `auth` for the session.
    pub fn new(auth: Arc<AuthFlow>) -> Self {
        Self { auth }
    }

    /// Translate `text` into `target_language`.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<TranslateResponse> {
        let request = TranslateRequest {
            text: text.to_string(),
            target_language: target_language.to_string(),
        };
        let request = &request;
        self.auth
            .call(|api, session| async move { api.translate(&session.session_id, request).await })
            .await
    }
}
