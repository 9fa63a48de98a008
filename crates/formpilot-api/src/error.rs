//! Error types for formpilot-api

use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum Error {
    /// Backend rejected the session (401) or the action (403)
    #[error("unauthorized (HTTP {status})")]
    Unauthorized {
        /// HTTP status code
        status: u16,
        /// Backend-supplied message, if any
        message: Option<String>,
    },

    /// Any other non-2xx response
    #[error("backend error (HTTP {status}): {}", .message.as_deref().unwrap_or("no details"))]
    Backend {
        /// HTTP status code
        status: u16,
        /// Backend-supplied message, if any
        message: Option<String>,
    },

    /// Transport failure
    #[error("network error: {0}")]
    Network(String),

    /// Request timed out
    #[error("timeout after {0}ms")]
    Timeout(u64),

    /// 2xx response whose body did not match the expected shape
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client could not be built from its configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// HTTP status, for errors that carry one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { status, .. } | Error::Backend { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// `401 Unauthorized`: the session is no longer valid.
    #[must_use]
    pub fn is_session_expired(&self) -> bool {
        self.status() == Some(401)
    }

    /// `401` or `403`.
    #[must_use]
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Error::Unauthorized { .. })
    }

    /// Message the backend attached to the failure.
    #[must_use]
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Error::Unauthorized { message, .. } | Error::Backend { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
