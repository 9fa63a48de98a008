use tracing::{debug, info};

use super::ApiClient;
use crate::error::Result;
use crate::types::{CurrentSession, LoginRequest, LoginResponse, SessionResponse};

impl ApiClient {
    /// Verify credentials. Does not create a session by itself.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        info!(email = %email, "Logging in");
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.client.post(self.url("/api/simple/login")).json(&body))
            .await
    }

    /// Create an account.
    pub async fn register(&self, email: &str, password: &str) -> Result<LoginResponse> {
        info!(email = %email, "Registering account");
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.send_json(self.client.post(self.url("/api/simple/register")).json(&body))
            .await
    }

    /// Issue (or refresh) the session for a user.
    pub async fn create_session(&self, user_id: &str) -> Result<SessionResponse> {
        debug!(user_id = %user_id, "Creating session");
        let url = self.endpoint(&["api", "session", "check-and-update", user_id])?;
        self.send_json(self.client.post(url)).await
    }

    /// Look up a session; fails with 401 when it is no longer valid.
    pub async fn current_session(&self, session_id: &str) -> Result<CurrentSession> {
        let url = self.endpoint(&["api", "session", "current", session_id])?;
        self.send_json(Self::authorize(self.client.get(url), session_id))
            .await
    }

    /// Invalidate a session on the backend.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        debug!("Deleting remote session");
        let url = self.endpoint(&["api", "session", session_id])?;
        self.send_empty(Self::authorize(self.client.delete(url), session_id))
            .await
    }
}
