//! Request and response bodies.
//!
//! The backend speaks snake_case JSON but some older endpoints answer in
//! camelCase, so identifiers accept both spellings on the way in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body of `POST /api/simple/login` and `POST /api/simple/register`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Account password
    pub password: String,
}

/// Login/registration result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginResponse {
    /// Backend user id
    #[serde(alias = "userId", deserialize_with = "string_or_number")]
    pub user_id: String,
    /// Account email as stored by the backend
    #[serde(default)]
    pub email: Option<String>,
}

/// Result of `POST /api/session/check-and-update/{user_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SessionResponse {
    /// Freshly issued (or re-used) session id
    #[serde(alias = "sessionId")]
    pub session_id: String,
}

/// Result of `GET /api/session/current/{session_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentSession {
    /// Session id
    #[serde(alias = "sessionId")]
    pub session_id: String,
    /// Owner
    #[serde(alias = "userId", deserialize_with = "string_or_number")]
    pub user_id: String,
    /// Owner email
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of `POST /api/generate-field-answer`.
#[derive(Debug, Clone, Serialize)]
pub struct FieldAnswerRequest {
    /// Resolved field label (the question)
    pub label: String,
    /// Surrounding page text
    pub context: String,
    /// Input type hint (`text`, `email`, `textarea`, ...)
    pub field_type: String,
    /// Page URL, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Requesting user
    pub user_id: String,
}

/// Generated answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldAnswerResponse {
    /// Text to write into the field
    pub answer: String,
    /// Where the answer came from (resume, personal info, generated)
    #[serde(default)]
    pub data_source: Option<String>,
}

/// Application progress of a tracked URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    /// Bookmarked, not yet applied
    #[default]
    Saved,
    /// Application sent
    Applied,
    /// Interview stage
    Interviewing,
    /// Offer received
    Offered,
    /// Rejected
    Rejected,
}

impl UrlStatus {
    /// Every status, in pipeline order.
    pub const ALL: [UrlStatus; 5] = [
        UrlStatus::Saved,
        UrlStatus::Applied,
        UrlStatus::Interviewing,
        UrlStatus::Offered,
        UrlStatus::Rejected,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            UrlStatus::Saved => "saved",
            UrlStatus::Applied => "applied",
            UrlStatus::Interviewing => "interviewing",
            UrlStatus::Offered => "offered",
            UrlStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for UrlStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrlStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        UrlStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == lower)
            .ok_or_else(|| format!("unknown url status '{}'", s))
    }
}

/// Body of `POST /api/urls/save`.
#[derive(Debug, Clone, Serialize)]
pub struct SaveUrlRequest {
    /// Page URL
    pub url: String,
    /// Page title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Company name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Initial status
    pub status: UrlStatus,
}

/// A bookmarked job application page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedUrl {
    /// Backend id
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Page URL
    pub url: String,
    /// Page title
    #[serde(default)]
    pub title: Option<String>,
    /// Company name
    #[serde(default)]
    pub company: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: UrlStatus,
    /// When the URL was saved
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UrlListResponse {
    Wrapped { urls: Vec<TrackedUrl> },
    Bare(Vec<TrackedUrl>),
}

impl UrlListResponse {
    pub(crate) fn into_urls(self) -> Vec<TrackedUrl> {
        match self {
            UrlListResponse::Wrapped { urls } | UrlListResponse::Bare(urls) => urls,
        }
    }
}

/// Result of `GET /api/urls/stats/summary`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlStats {
    /// Total tracked URLs
    #[serde(default)]
    pub total: u64,
    /// Count per status
    #[serde(default)]
    pub by_status: BTreeMap<UrlStatus, u64>,
}

impl UrlStats {
    /// Count for one status (zero when absent).
    pub fn count(&self, status: UrlStatus) -> u64 {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

/// Result of `GET /api/v1/documents/status`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStatus {
    /// A resume has been uploaded and processed
    #[serde(default)]
    pub has_resume: bool,
    /// Personal info document is present
    #[serde(default)]
    pub has_personal_info: bool,
    /// Number of stored documents
    #[serde(default)]
    pub total_documents: u64,
}

/// Body of `POST /api/translate`.
#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    /// Source text
    pub text: String,
    /// Target language code, e.g. `en`
    pub target_language: String,
}

/// Translation result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslateResponse {
    /// Translated text
    #[serde(alias = "translation")]
    pub translated_text: String,
    /// Detected source language, when reported
    #[serde(default)]
    pub source_language: Option<String>,
}

/// Error body shapes seen from the backend.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> Option<String> {
        let detail = self.detail.and_then(|d| match d {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Null => None,
            other => Some(other.to_string()),
        });
        detail.or(self.message).or(self.error).filter(|m| !m.trim().is_empty())
    }
}

/// Ids arrive as strings from some endpoints and integers from others.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
