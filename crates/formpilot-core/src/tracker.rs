//! URL tracker - job application bookmarks kept on the backend.

use std::sync::Arc;

use formpilot_api::{SaveUrlRequest, TrackedUrl, UrlStats, UrlStatus};

use crate::auth::AuthFlow;
use crate::error::{Error, Result};

/// Authenticated access to the tracked-URL endpoints.
pub struct UrlTracker {
    auth: Arc<AuthFlow>,
}

impl UrlTracker {
    /// Create a tracker using `auth` for the session.
    pub fn new(auth: Arc<AuthFlow>) -> Self {
        Self { auth }
    }

    /// Bookmark `url`.
    pub async fn save(
        &self,
        url: &str,
        title: Option<String>,
        company: Option<String>,
        status: UrlStatus,
    ) -> Result<TrackedUrl> {
        if url.trim().is_empty() {
            return Err(Error::InvalidMessage("url must not be empty".to_string()));
        }
        let request = SaveUrlRequest {
            url: url.trim().to_string(),
            title,
            company,
            status,
        };
        let request = &request;
        self.auth
            .call(|api, session| async move { api.save_url(&session.session_id, request).await })
            .await
    }

    /// Move a bookmark to `status`.
    pub async fn update_status(&self, id: &str, status: UrlStatus) -> Result<()> {
        self.auth
            .call(|api, session| async move {
                api.update_url_status(&session.session_id, id, status).await
            })
            .await
    }

    /// Every bookmark of the logged-in user.
    pub async fn list(&self) -> Result<Vec<TrackedUrl>> {
        self.auth
            .call(|api, session| async move { api.list_urls(&session.session_id).await })
            .await
    }

    /// Per-status counts.
    pub async fn stats(&self) -> Result<UrlStats> {
        self.auth
            .call(|api, session| async move { api.url_stats(&session.session_id).await })
            .await
    }
}
