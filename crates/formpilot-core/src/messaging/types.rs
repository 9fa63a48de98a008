use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, UserFriendlyError};
use crate::session::{AuthState, Session};

/// An execution context that can send and receive messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    /// Web app page script
    Page,
    /// Script injected into third-party pages
    ContentScript,
    /// Toolbar popup
    Popup,
    /// Extension background worker
    Background,
}

impl Surface {
    /// Every surface.
    pub const ALL: [Surface; 4] = [
        Surface::Page,
        Surface::ContentScript,
        Surface::Popup,
        Surface::Background,
    ];

    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Page => "page",
            Surface::ContentScript => "content_script",
            Surface::Popup => "popup",
            Surface::Background => "background",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cross-context message, tagged by `action`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    /// Ask for the current login state
    GetAuthStatus,
    /// Drop everything the receiver stores, session and settings alike
    ClearStorage,
    /// Storage changed elsewhere; reconcile now
    AuthenticationUpdated,
    /// Ask whether the web app page is logged in
    CheckWebAppLogin,
    /// Switch in-page translation
    ToggleTranslation {
        /// New flag value
        enabled: bool,
    },
    /// Copy a session into the receiver's store
    SyncSession {
        /// Session to store
        session: Session,
    },
    /// Drop the receiver's session
    ClearSession,
    /// Write an answer into the focused field
    FillField {
        /// Text to insert
        answer: String,
    },
    /// Create an account and log in
    Register {
        /// Account email
        email: String,
        /// Account password
        password: String,
    },
    /// Log out everywhere the receiver can reach
    Logout,
    /// Check the stored session against the backend
    ValidateSession,
}

impl ExtensionMessage {
    /// Decode and validate an incoming payload.
    pub fn parse(value: serde_json::Value) -> Result<Self> {
        let message: Self =
            serde_json::from_value(value).map_err(|e| Error::InvalidMessage(e.to_string()))?;
        message.validate()?;
        Ok(message)
    }

    /// Decode and validate a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|e| Error::InvalidMessage(e.to_string()))?;
        Self::parse(value)
    }

    fn validate(&self) -> Result<()> {
        match self {
            ExtensionMessage::SyncSession { session }
                if session.session_id.trim().is_empty() || session.user_id.trim().is_empty() =>
            {
                Err(Error::InvalidMessage(
                    "syncSession requires sessionId and userId".to_string(),
                ))
            }
            ExtensionMessage::Register { email, password }
                if email.trim().is_empty() || password.is_empty() =>
            {
                Err(Error::InvalidMessage(
                    "register requires email and password".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// The `action` tag, for logging.
    pub fn action(&self) -> &'static str {
        match self {
            ExtensionMessage::GetAuthStatus => "getAuthStatus",
            ExtensionMessage::ClearStorage => "clearStorage",
            ExtensionMessage::AuthenticationUpdated => "authenticationUpdated",
            ExtensionMessage::CheckWebAppLogin => "checkWebAppLogin",
            ExtensionMessage::ToggleTranslation { .. } => "toggleTranslation",
            ExtensionMessage::SyncSession { .. } => "syncSession",
            ExtensionMessage::ClearSession => "clearSession",
            ExtensionMessage::FillField { .. } => "fillField",
            ExtensionMessage::Register { .. } => "register",
            ExtensionMessage::Logout => "logout",
            ExtensionMessage::ValidateSession => "validateSession",
        }
    }
}

/// Reply to an [`ExtensionMessage`], tagged by `status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MessageResponse {
    /// Login state of the replying context
    AuthStatus {
        /// Whether a session is present
        logged_in: bool,
        /// User id, when logged in
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_id: Option<String>,
        /// Email, when known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
    /// Handled, nothing to report
    Ack,
    /// Handling failed
    Error {
        /// Banner text
        message: String,
    },
}

impl MessageResponse {
    /// Status reply for `state`.
    pub fn auth_status(state: &AuthState) -> Self {
        match state.session() {
            Some(session) => MessageResponse::AuthStatus {
                logged_in: true,
                user_id: Some(session.user_id.clone()),
                email: session.email.clone(),
            },
            None => MessageResponse::AuthStatus {
                logged_in: false,
                user_id: None,
                email: None,
            },
        }
    }

    /// Error reply carrying the user-facing message.
    pub fn error(error: &Error) -> Self {
        MessageResponse::Error {
            message: error.user_message(),
        }
    }

    /// Whether this reply reports a logged-in context.
    pub fn is_logged_in(&self) -> bool {
        matches!(self, MessageResponse::AuthStatus { logged_in: true, .. })
    }
}
