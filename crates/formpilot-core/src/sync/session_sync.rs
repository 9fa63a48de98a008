use std::sync::{Arc, Mutex};

use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::session::{AuthState, Session};
use crate::storage::KeyValueStore;

/// Session transitions observed by one context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A session appeared
    LoggedIn {
        /// Observing context
        context: String,
        /// The new session
        session: Session,
    },
    /// The session disappeared (or none was present on first observation)
    LoggedOut {
        /// Observing context
        context: String,
    },
    /// A different session replaced the previous one
    SessionChanged {
        /// Observing context
        context: String,
        /// The replacing session
        session: Session,
    },
}

impl SessionEvent {
    /// Context that observed the event.
    pub fn context(&self) -> &str {
        match self {
            SessionEvent::LoggedIn { context, .. }
            | SessionEvent::LoggedOut { context }
            | SessionEvent::SessionChanged { context, .. } => context,
        }
    }

    /// Whether the context ended up logged in.
    pub fn is_logged_in(&self) -> bool {
        !matches!(self, SessionEvent::LoggedOut { .. })
    }
}

/// One context's observable view of the session.
pub struct SessionSync {
    context: String,
    store: Arc<dyn KeyValueStore>,
    /// Last state seen by `reconcile`; `None` until the first call.
    last_seen: Mutex<Option<AuthState>>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionSync {
    /// Create a view named `context` over `store`.
    pub fn new(context: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        let (events, _) = broadcast::channel(32);
        Self {
            context: context.into(),
            store,
            last_seen: Mutex::new(None),
            events,
        }
    }

    /// Context name used in events and logs.
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Underlying store.
    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    /// Receive every future [`SessionEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Current session; storage failures read as "no session".
    pub async fn load(&self) -> Option<Session> {
        match Session::load(self.store.as_ref()).await {
            Ok(session) => session,
            Err(e) => {
                warn!(context = %self.context, error = %e, "Session read failed, treating as logged out");
                None
            }
        }
    }

    /// Current login state.
    pub async fn state(&self) -> AuthState {
        self.load().await.into()
    }

    /// Whether a session is present.
    pub async fn is_authenticated(&self) -> bool {
        self.load().await.is_some()
    }

    /// Persist `session` in this context and publish the change.
    pub async fn save(&self, session: &Session) -> Result<()> {
        session.store(self.store.as_ref()).await?;
        info!(context = %self.context, user_id = %session.user_id, "Session stored");
        self.reconcile().await;
        Ok(())
    }

    /// Remove the session from this context and publish the change.
    pub async fn clear(&self) -> Result<()> {
        Session::erase(self.store.as_ref()).await?;
        info!(context = %self.context, "Session cleared");
        self.reconcile().await;
        Ok(())
    }

    /// Wipe every key in this context's store and publish the change.
    pub async fn clear_storage(&self) -> Result<()> {
        self.store.clear().await?;
        info!(context = %self.context, "Storage cleared");
        self.reconcile().await;
        Ok(())
    }

    /// Compare storage with the last observed state and publish on change.
    ///
    /// Shared by the poll timer and the storage-change listener. Returns the
    /// published event, if any.
    pub async fn reconcile(&self) -> Option<SessionEvent> {
        let current = self.state().await;

        let event = {
            let mut last_seen = match self.last_seen.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let event = transition(&self.context, last_seen.as_ref(), &current);
            *last_seen = Some(current);
            event
        }?;

        debug!(context = %self.context, event = ?event, "Session state changed");
        // No subscribers is fine
        let _ = self.events.send(event.clone());
        Some(event)
    }
}

fn transition(context: &str, previous: Option<&AuthState>, current: &AuthState) -> Option<SessionEvent> {
    let context = context.to_string();
    match (previous, current) {
        (Some(prev), cur) if prev == cur => None,
        (Some(AuthState::LoggedIn(_)), AuthState::LoggedIn(session)) => {
            Some(SessionEvent::SessionChanged {
                context,
                session: session.clone(),
            })
        }
        (_, AuthState::LoggedIn(session)) => Some(SessionEvent::LoggedIn {
            context,
            session: session.clone(),
        }),
        (_, AuthState::LoggedOut) => Some(SessionEvent::LoggedOut { context }),
    }
}
