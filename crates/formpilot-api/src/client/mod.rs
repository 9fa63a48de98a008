//! HTTP client
//!
//! One `reqwest::Client` per [`ApiClient`]; endpoint groups live in the
//! submodules (`session`, `urls`, `assist`).

mod assist;
mod session;
mod urls;

use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::error::{Error, Result};
use crate::types::ErrorBody;

/// Backend API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Configuration(format!("HTTP client error: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create a client from `FORMPILOT_API_URL` or defaults.
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env())
    }

    /// Active configuration.
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.normalized_base_url(), path)
    }

    /// URL for a path with caller-supplied ids; every segment is
    /// percent-encoded, so `/` or `?` inside an id stays inside it.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let base = self.config.normalized_base_url();
        let mut url = Url::parse(base)
            .map_err(|e| Error::Configuration(format!("invalid base URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|()| Error::Configuration(format!("base URL {} cannot have a path", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Attach the session credential.
    fn authorize(request: RequestBuilder, session_id: &str) -> RequestBuilder {
        request.bearer_auth(session_id)
    }

    async fn dispatch(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout(self.config.timeout().as_millis() as u64)
            } else if e.is_connect() {
                Error::Network(format!(
                    "Failed to connect to backend at {}: {}",
                    self.config.normalized_base_url(),
                    e
                ))
            } else {
                Error::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(ErrorBody::into_message);
        warn!(status = status.as_u16(), message = ?message, "Backend request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Unauthorized {
                status: status.as_u16(),
                message,
            },
            _ => Error::Backend {
                status: status.as_u16(),
                message,
            },
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.dispatch(request).await?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            debug!(body = %body, "Unparseable backend response");
            Error::InvalidResponse(e.to_string())
        })
    }

    async fn send_empty(&self, request: RequestBuilder) -> Result<()> {
        self.dispatch(request).await.map(|_| ())
    }
}
