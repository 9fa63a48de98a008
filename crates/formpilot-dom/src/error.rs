//! Error types for formpilot-dom

use thiserror::Error;

/// DOM error type
#[derive(Debug, Error)]
pub enum Error {
    /// Snapshot JSON could not be parsed
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Snapshot root must be an element
    #[error("snapshot root must be an element, got text")]
    TextRoot,

    /// No element carries the requested id
    #[error("element not found: #{0}")]
    ElementNotFound(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidSnapshot(e.to_string())
    }
}
