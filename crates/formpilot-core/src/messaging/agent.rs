use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use super::bus::MessageHandler;
use super::types::{ExtensionMessage, MessageResponse, Surface};
use crate::auth::AuthFlow;
use crate::error::Error;
use crate::sync::SessionSync;
use crate::translation::TranslationState;

/// Session-facing message handler shared by every surface.
///
/// Without an [`AuthFlow`] (e.g. the page context, which never talks to the
/// backend) `register` and `validateSession` are refused and `logout` only
/// clears locally.
pub struct SyncAgent {
    sync: Arc<SessionSync>,
    auth: Option<Arc<AuthFlow>>,
}

impl SyncAgent {
    /// Agent answering from `sync` only.
    pub fn new(sync: Arc<SessionSync>) -> Self {
        Self { sync, auth: None }
    }

    /// Agent that can also reach the backend.
    pub fn with_auth(auth: Arc<AuthFlow>) -> Self {
        Self {
            sync: auth.sync().clone(),
            auth: Some(auth),
        }
    }

    /// Session view this agent answers from.
    pub fn sync(&self) -> &Arc<SessionSync> {
        &self.sync
    }

    async fn status(&self) -> MessageResponse {
        MessageResponse::auth_status(&self.sync.state().await)
    }

    fn require_auth(&self, action: &str) -> Result<&Arc<AuthFlow>, MessageResponse> {
        self.auth.as_ref().ok_or_else(|| MessageResponse::Error {
            message: format!("{} is not available in this context", action),
        })
    }
}

#[async_trait]
impl MessageHandler for SyncAgent {
    async fn handle(&self, from: Surface, message: ExtensionMessage) -> MessageResponse {
        let action = message.action();
        debug!(context = %self.sync.context(), from = %from, action, "Handling message");

        let result = match message {
            ExtensionMessage::GetAuthStatus | ExtensionMessage::CheckWebAppLogin => {
                return self.status().await;
            }
            ExtensionMessage::AuthenticationUpdated => {
                self.sync.reconcile().await;
                return self.status().await;
            }
            ExtensionMessage::SyncSession { session } => self.sync.save(&session).await,
            ExtensionMessage::ClearSession => self.sync.clear().await,
            ExtensionMessage::ClearStorage => self.sync.clear_storage().await,
            ExtensionMessage::Logout => match &self.auth {
                Some(auth) => auth.logout().await,
                None => self.sync.clear().await,
            },
            ExtensionMessage::ToggleTranslation { enabled } => {
                info!(enabled, "Translation toggled");
                TranslationState { enabled }
                    .save(self.sync.store().as_ref())
                    .await
            }
            ExtensionMessage::Register { email, password } => {
                let auth = match self.require_auth(action) {
                    Ok(auth) => auth,
                    Err(response) => return response,
                };
                match auth.register(&email, &password).await {
                    Ok(_) => return self.status().await,
                    Err(e) => Err(e),
                }
            }
            ExtensionMessage::ValidateSession => {
                let auth = match self.require_auth(action) {
                    Ok(auth) => auth,
                    Err(response) => return response,
                };
                match auth.validate().await {
                    Ok(_) => return self.status().await,
                    Err(e) => Err(e),
                }
            }
            ExtensionMessage::FillField { .. } => Err(Error::InvalidMessage(
                "fillField must be sent to the content script".to_string(),
            )),
        };

        match result {
            Ok(()) => MessageResponse::Ack,
            Err(e) => {
                debug!(action, error = %e, "Message handling failed");
                MessageResponse::error(&e)
            }
        }
    }
}
