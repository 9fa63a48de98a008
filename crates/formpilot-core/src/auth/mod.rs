//! Auth - login/logout and authenticated backend calls
//!
//! [`AuthFlow`] owns the backend client and one context's [`SessionSync`].
//! Every authenticated call goes through [`AuthFlow::call`] or
//! [`AuthFlow::call_with_refresh`], which load the stored session, attach it,
//! and apply the 401 policy:
//!
//! - `call`: a 401 clears the local session once and returns
//!   [`Error::NotAuthenticated`].
//! - `call_with_refresh`: a 401/403 triggers one silent session refresh and
//!   one retry; a second failure clears the session and returns
//!   [`Error::SessionExpired`].

use std::future::Future;
use std::sync::Arc;

use formpilot_api::{ApiClient, LoginResponse};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::session::Session;
use crate::sync::SessionSync;

/// Session lifecycle against the backend for one context.
pub struct AuthFlow {
    api: ApiClient,
    sync: Arc<SessionSync>,
}

impl AuthFlow {
    /// Create a flow over `api`, persisting through `sync`.
    pub fn new(api: ApiClient, sync: Arc<SessionSync>) -> Self {
        Self { api, sync }
    }

    /// Backend client.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Session view this flow writes to.
    pub fn sync(&self) -> &Arc<SessionSync> {
        &self.sync
    }

    /// Log in and persist the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let login = self.api.login(email, password).await?;
        self.establish(login, email).await
    }

    /// Create an account; the backend logs the new user in directly.
    pub async fn register(&self, email: &str, password: &str) -> Result<Session> {
        let login = self.api.register(email, password).await?;
        self.establish(login, email).await
    }

    async fn establish(&self, login: LoginResponse, email: &str) -> Result<Session> {
        let created = self.api.create_session(&login.user_id).await?;
        if created.session_id.trim().is_empty() {
            return Err(formpilot_api::Error::InvalidResponse("empty session id".to_string()).into());
        }

        let session = Session::new(
            created.session_id,
            login.user_id,
            login.email.or_else(|| Some(email.to_string())),
        );
        self.sync.save(&session).await?;
        info!(user_id = %session.user_id, "Logged in");
        Ok(session)
    }

    /// Clear the local session, then invalidate it remotely if possible.
    ///
    /// The remote call is best-effort: its failure is logged and ignored.
    pub async fn logout(&self) -> Result<()> {
        let session = self.sync.load().await;
        self.sync.clear().await?;

        if let Some(session) = session {
            if let Err(e) = self.api.delete_session(&session.session_id).await {
                warn!(error = %e, "Remote session invalidation failed");
            }
        }
        info!("Logged out");
        Ok(())
    }

    /// Ask the backend whether the stored session is still valid.
    ///
    /// Returns `false` with no session. A 401 clears local state.
    pub async fn validate(&self) -> Result<bool> {
        let Some(session) = self.sync.load().await else {
            return Ok(false);
        };

        match self.api.current_session(&session.session_id).await {
            Ok(current) => {
                debug!(user_id = %current.user_id, "Session is valid");
                Ok(true)
            }
            Err(e) if e.is_session_expired() => {
                self.expire().await;
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Obtain a fresh session id for the stored user.
    pub async fn refresh(&self) -> Result<Session> {
        let current = self.require().await?;
        let created = self.api.create_session(&current.user_id).await?;

        let session = Session::new(created.session_id, current.user_id, current.email);
        self.sync.save(&session).await?;
        debug!(user_id = %session.user_id, "Session refreshed");
        Ok(session)
    }

    /// Stored session, or [`Error::NotAuthenticated`].
    pub async fn require(&self) -> Result<Session> {
        self.sync.load().await.ok_or(Error::NotAuthenticated)
    }

    /// Run `op` with the stored session. A 401 clears the session.
    pub async fn call<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(ApiClient, Session) -> Fut,
        Fut: Future<Output = formpilot_api::Result<T>>,
    {
        let session = self.require().await?;
        match op(self.api.clone(), session).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_session_expired() => {
                self.expire().await;
                Err(Error::NotAuthenticated)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Run `op`, refreshing the session and retrying once on 401/403.
    pub async fn call_with_refresh<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(ApiClient, Session) -> Fut,
        Fut: Future<Output = formpilot_api::Result<T>>,
    {
        let session = self.require().await?;
        match op(self.api.clone(), session).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_auth_failure() => {
                debug!(status = ?e.status(), "Authenticated call rejected, refreshing session");
            }
            Err(e) => return Err(e.into()),
        }

        let refreshed = match self.refresh().await {
            Ok(session) => session,
            Err(Error::Api(e)) if e.is_auth_failure() => {
                self.expire().await;
                return Err(Error::SessionExpired);
            }
            Err(e) => return Err(e),
        };

        match op(self.api.clone(), refreshed).await {
            Ok(value) => Ok(value),
            Err(e) if e.is_auth_failure() => {
                self.expire().await;
                Err(Error::SessionExpired)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Local-only cleanup after the backend rejected the session.
    async fn expire(&self) {
        warn!(context = %self.sync.context(), "Backend rejected session, clearing local state");
        if let Err(e) = self.sync.clear().await {
            warn!(error = %e, "Failed to clear expired session");
        }
    }
}
