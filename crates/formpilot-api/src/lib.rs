//! FormPilot API - backend HTTP client
//!
//! Typed wrappers over the answer backend's REST endpoints: login and
//! session lifecycle, field answer generation, the URL tracker, document
//! status and translation.
//!
//! Authenticated endpoints take the raw session id and send it as
//! `Authorization: Bearer <session_id>`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
/// Backend URL and timeout
pub mod config;
pub mod error;
pub mod types;

pub use client::ApiClient;
pub use config::ApiConfig;
pub use error::{Error, Result};
pub use types::{
    CurrentSession, DocumentStatus, FieldAnswerRequest, FieldAnswerResponse, LoginRequest,
    LoginResponse, SaveUrlRequest, SessionResponse, TrackedUrl, TranslateRequest,
    TranslateResponse, UrlStats, UrlStatus,
};
