//! Messaging - typed request/response between extension surfaces
//!
//! Payloads are validated into [`ExtensionMessage`] at the boundary. The
//! [`MessageBus`] routes them to one [`MessageHandler`] per [`Surface`].

/// Session-facing handler.
pub mod agent;
/// Routing, fire-and-forget sends and timed requests.
pub mod bus;
/// Message, reply and surface types.
pub mod types;

pub use agent::SyncAgent;
pub use bus::{check_web_app_login, MessageBus, MessageHandler};
pub use types::{ExtensionMessage, MessageResponse, Surface};

#[cfg(test)]
mod tests;
