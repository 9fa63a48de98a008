use serde_json::json;
use tracing::info;

use super::ApiClient;
use crate::error::Result;
use crate::types::{SaveUrlRequest, TrackedUrl, UrlListResponse, UrlStats, UrlStatus};

impl ApiClient {
    /// Bookmark a job application page.
    pub async fn save_url(&self, session_id: &str, request: &SaveUrlRequest) -> Result<TrackedUrl> {
        info!(url = %request.url, status = %request.status, "Saving tracked URL");
        let builder = self.client.post(self.url("/api/urls/save")).json(request);
        self.send_json(Self::authorize(builder, session_id)).await
    }

    /// Move a tracked URL to a new status.
    pub async fn update_url_status(
        &self,
        session_id: &str,
        id: &str,
        status: UrlStatus,
    ) -> Result<()> {
        info!(id = %id, status = %status, "Updating tracked URL status");
        let builder = self
            .client
            .put(self.endpoint(&["api", "urls", id, "status"])?)
            .json(&json!({ "status": status }));
        self.send_empty(Self::authorize(builder, session_id)).await
    }

    /// All tracked URLs for the session's user.
    pub async fn list_urls(&self, session_id: &str) -> Result<Vec<TrackedUrl>> {
        let builder = self.client.get(self.url("/api/urls/list"));
        let list: UrlListResponse = self.send_json(Self::authorize(builder, session_id)).await?;
        Ok(list.into_urls())
    }

    /// Per-status counts.
    pub async fn url_stats(&self, session_id: &str) -> Result<UrlStats> {
        let builder = self.client.get(self.url("/api/urls/stats/summary"));
        self.send_json(Self::authorize(builder, session_id)).await
    }
}
