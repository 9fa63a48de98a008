use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Web app poll of page storage
pub const DEFAULT_WEB_APP_POLL_MS: u64 = 2_000;

/// Background auth-status refresh
pub const DEFAULT_EXTENSION_POLL_MS: u64 = 10_000;

/// Popup auth-status refresh
pub const DEFAULT_POPUP_POLL_MS: u64 = 15_000;

/// Request/response message timeout
pub const DEFAULT_MESSAGE_TIMEOUT_MS: u64 = 3_000;

/// Polling and messaging intervals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Web app storage poll interval (ms)
    #[serde(default = "default_web_app_poll_ms")]
    pub web_app_poll_ms: u64,

    /// Extension background refresh interval (ms)
    #[serde(default = "default_extension_poll_ms")]
    pub extension_poll_ms: u64,

    /// Popup refresh interval (ms)
    #[serde(default = "default_popup_poll_ms")]
    pub popup_poll_ms: u64,

    /// How long a request waits for a reply (ms)
    #[serde(default = "default_message_timeout_ms")]
    pub message_timeout_ms: u64,
}

fn default_web_app_poll_ms() -> u64 {
    DEFAULT_WEB_APP_POLL_MS
}

fn default_extension_poll_ms() -> u64 {
    DEFAULT_EXTENSION_POLL_MS
}

fn default_popup_poll_ms() -> u64 {
    DEFAULT_POPUP_POLL_MS
}

fn default_message_timeout_ms() -> u64 {
    DEFAULT_MESSAGE_TIMEOUT_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            web_app_poll_ms: default_web_app_poll_ms(),
            extension_poll_ms: default_extension_poll_ms(),
            popup_poll_ms: default_popup_poll_ms(),
            message_timeout_ms: default_message_timeout_ms(),
        }
    }
}

impl SyncConfig {
    /// Web app poll interval.
    pub fn web_app_poll(&self) -> Duration {
        Duration::from_millis(self.web_app_poll_ms)
    }

    /// Extension background refresh interval.
    pub fn extension_poll(&self) -> Duration {
        Duration::from_millis(self.extension_poll_ms)
    }

    /// Popup refresh interval.
    pub fn popup_poll(&self) -> Duration {
        Duration::from_millis(self.popup_poll_ms)
    }

    /// Message request timeout.
    pub fn message_timeout(&self) -> Duration {
        Duration::from_millis(self.message_timeout_ms)
    }
}
