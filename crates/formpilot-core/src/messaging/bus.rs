use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, RwLock};
use tracing::{debug, warn};
use uuid::Uuid;

use super::types::{ExtensionMessage, MessageResponse, Surface};
use crate::error::{Error, Result};
use crate::sync::SyncConfig;

/// Receives messages addressed to one surface.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle `message` sent by `from`.
    async fn handle(&self, from: Surface, message: ExtensionMessage) -> MessageResponse;
}

/// Routes messages between surfaces.
///
/// Each surface has at most one handler. `send` is fire-and-forget;
/// `request` waits for the reply up to the configured timeout and never
/// retries.
pub struct MessageBus {
    handlers: RwLock<HashMap<Surface, Arc<dyn MessageHandler>>>,
    timeout: Duration,
}

impl MessageBus {
    /// Create a bus whose requests give up after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            timeout,
        }
    }

    /// Create a bus using the configured message timeout.
    #[must_use]
    pub fn from_config(config: &SyncConfig) -> Self {
        Self::new(config.message_timeout())
    }

    /// Request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Install the handler for `surface`, returning the previous one.
    pub async fn register(
        &self,
        surface: Surface,
        handler: Arc<dyn MessageHandler>,
    ) -> Option<Arc<dyn MessageHandler>> {
        debug!(surface = %surface, "Registering message handler");
        self.handlers.write().await.insert(surface, handler)
    }

    /// Remove the handler for `surface`.
    pub async fn unregister(&self, surface: Surface) -> bool {
        self.handlers.write().await.remove(&surface).is_some()
    }

    /// Whether `surface` currently has a handler.
    pub async fn is_registered(&self, surface: Surface) -> bool {
        self.handlers.read().await.contains_key(&surface)
    }

    async fn handler(&self, surface: Surface) -> Option<Arc<dyn MessageHandler>> {
        self.handlers.read().await.get(&surface).cloned()
    }

    /// Deliver without waiting for the reply. Returns whether a handler was
    /// registered for `to`.
    pub async fn send(&self, from: Surface, to: Surface, message: ExtensionMessage) -> bool {
        let Some(handler) = self.handler(to).await else {
            debug!(from = %from, to = %to, action = message.action(), "No receiver for message");
            return false;
        };

        tokio::spawn(async move {
            let action = message.action();
            let response = handler.handle(from, message).await;
            debug!(from = %from, to = %to, action, response = ?response, "Message handled");
        });
        true
    }

    /// Fire-and-forget to every other surface. Returns the number reached.
    pub async fn broadcast(&self, from: Surface, message: ExtensionMessage) -> usize {
        let mut delivered = 0;
        for to in Surface::ALL {
            if to != from && self.send(from, to, message.clone()).await {
                delivered += 1;
            }
        }
        delivered
    }

    /// Send and wait for the reply.
    ///
    /// Fails with [`Error::NoReceiver`] when nothing handles `to`, and with
    /// [`Error::Timeout`] when no reply arrives in time; the late reply, if
    /// any, is dropped.
    pub async fn request(
        &self,
        from: Surface,
        to: Surface,
        message: ExtensionMessage,
    ) -> Result<MessageResponse> {
        let request_id = Uuid::new_v4();
        let action = message.action();
        let Some(handler) = self.handler(to).await else {
            warn!(%request_id, from = %from, to = %to, action, "Request has no receiver");
            return Err(Error::NoReceiver(to.to_string()));
        };

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let response = handler.handle(from, message).await;
            // Requester may have timed out already
            let _ = tx.send(response);
        });

        tokio::select! {
            result = rx => match result {
                Ok(response) => {
                    debug!(%request_id, from = %from, to = %to, action, "Request answered");
                    Ok(response)
                }
                Err(_) => {
                    warn!(%request_id, to = %to, action, "Handler dropped the reply");
                    Err(Error::NoReceiver(to.to_string()))
                }
            },
            _ = tokio::time::sleep(self.timeout) => {
                task.abort();
                let timeout_ms = self.timeout.as_millis() as u64;
                warn!(%request_id, from = %from, to = %to, action, timeout_ms, "Request timed out");
                Err(Error::Timeout(timeout_ms))
            }
        }
    }
}

impl Default for MessageBus {
    fn default() -> Self {
        Self::from_config(&SyncConfig::default())
    }
}

/// Ask the content script whether the web app page holds a session.
///
/// Every failure, including a timeout, answers `false`.
pub async fn check_web_app_login(bus: &MessageBus, from: Surface) -> bool {
    match bus
        .request(from, Surface::ContentScript, ExtensionMessage::CheckWebAppLogin)
        .await
    {
        Ok(response) => response.is_logged_in(),
        Err(e) => {
            debug!(error = %e, "Web app login check failed");
            false
        }
    }
}
