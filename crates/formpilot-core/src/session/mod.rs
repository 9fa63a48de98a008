//! Session - the authenticated user, as mirrored into every context
//!
//! The backend is the only authority on whether a session id is valid; the
//! copies kept here carry no expiry and are dropped on logout or on a 401.

pub mod keys;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::KeyValueStore;

/// The (session id, user id, email) triple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Opaque bearer token
    pub session_id: String,
    /// Backend user id
    pub user_id: String,
    /// Account email
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    /// Create a session value.
    pub fn new(
        session_id: impl Into<String>,
        user_id: impl Into<String>,
        email: Option<String>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: user_id.into(),
            email,
        }
    }

    /// Read the session from a store.
    ///
    /// Canonical keys win; legacy snake_case keys are read as a fallback.
    /// Both id fields must be present and non-empty.
    pub async fn load(store: &dyn KeyValueStore) -> Result<Option<Self>> {
        let session_id = keys::read(store, keys::SESSION_ID).await?;
        let user_id = keys::read(store, keys::USER_ID).await?;
        let email = keys::read(store, keys::EMAIL).await?;

        Ok(match (session_id, user_id) {
            (Some(session_id), Some(user_id)) => Some(Self {
                session_id,
                user_id,
                email,
            }),
            _ => None,
        })
    }

    /// Write the session under the canonical keys.
    pub async fn store(&self, store: &dyn KeyValueStore) -> Result<()> {
        store.set(keys::SESSION_ID, &self.session_id).await?;
        store.set(keys::USER_ID, &self.user_id).await?;
        match &self.email {
            Some(email) => store.set(keys::EMAIL, email).await?,
            None => keys::remove(store, keys::EMAIL).await?,
        }
        Ok(())
    }

    /// Remove every session key, canonical and legacy.
    pub async fn erase(store: &dyn KeyValueStore) -> Result<()> {
        for key in keys::SESSION_KEYS {
            keys::remove(store, key).await?;
        }
        Ok(())
    }
}

/// Per-context login state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "session", rename_all = "snake_case")]
pub enum AuthState {
    /// No usable session
    #[default]
    LoggedOut,
    /// Session present
    LoggedIn(Session),
}

impl AuthState {
    /// Whether a session is present.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, AuthState::LoggedIn(_))
    }

    /// The session, if logged in.
    pub fn session(&self) -> Option<&Session> {
        match self {
            AuthState::LoggedIn(session) => Some(session),
            AuthState::LoggedOut => None,
        }
    }
}

impl From<Option<Session>> for AuthState {
    fn from(session: Option<Session>) -> Self {
        session.map_or(AuthState::LoggedOut, AuthState::LoggedIn)
    }
}

#[cfg(test)]
mod tests;
