//! Error types for formpilot-core
//!
//! This module provides the core error type and the inline banner text shown
//! to users when an action fails.

use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// No session in storage
    #[error("not logged in")]
    NotAuthenticated,

    /// Backend rejected the session and local session data was cleared
    #[error("session expired")]
    SessionExpired,

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(String),

    /// Message payload failed validation
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// No reply within the request timeout
    #[error("message timeout after {0}ms")]
    Timeout(u64),

    /// No handler registered for the target surface
    #[error("no handler registered for {0}")]
    NoReceiver(String),

    /// `fillField` arrived with nothing focused
    #[error("no field is focused")]
    NoFocusedField,

    /// Backend client error
    #[error("api error: {0}")]
    Api(#[from] formpilot_api::Error),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Human-readable rendering of an error, for the inline error banner.
pub trait UserFriendlyError {
    /// Message shown in the banner
    fn user_message(&self) -> String;

    /// What the user can do about it
    fn suggestion(&self) -> Option<String>;
}

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

impl UserFriendlyError for Error {
    fn user_message(&self) -> String {
        match self {
            Error::NotAuthenticated => "Please log in to use FormPilot.".to_string(),
            Error::SessionExpired => "Your session has expired. Please log in again.".to_string(),
            Error::Api(formpilot_api::Error::Network(_))
            | Error::Api(formpilot_api::Error::Timeout(_)) => {
                "Could not reach the FormPilot server.".to_string()
            }
            Error::Api(e) => e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| GENERIC_MESSAGE.to_string()),
            Error::NoFocusedField => "Click into a form field first.".to_string(),
            Error::Timeout(_) => "The extension did not respond in time.".to_string(),
            Error::NoReceiver(_) => "The FormPilot extension is not available here.".to_string(),
            Error::Storage(_) | Error::InvalidMessage(_) | Error::Configuration(_) => {
                GENERIC_MESSAGE.to_string()
            }
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            Error::NotAuthenticated | Error::SessionExpired => {
                Some("Run `formpilot login` or sign in from the web app.".to_string())
            }
            Error::Api(formpilot_api::Error::Network(_))
            | Error::Api(formpilot_api::Error::Timeout(_)) => Some(
                "Check your connection and the `api.base_url` setting.".to_string(),
            ),
            Error::Configuration(_) => {
                Some("Check config/default.toml or FORMPILOT_* variables.".to_string())
            }
            _ => None,
        }
    }
}

/// Banner text: message, plus the suggestion on a second line when there is one.
pub fn format_error_banner(error: &Error) -> String {
    match error.suggestion() {
        Some(suggestion) => format!("{}\n{}", error.user_message(), suggestion),
        None => error.user_message(),
    }
}
