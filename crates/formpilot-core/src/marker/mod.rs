//! Marker - status attributes on the document root
//!
//! Content scripts and page scripts share the DOM but nothing else. The
//! content script publishes its login state as `data-formpilot-*` attributes
//! on `<html>` and fires `formpilot:status`; page code reads the attributes
//! directly when messaging is unavailable.

use chrono::{DateTime, TimeZone, Utc};
use formpilot_dom::{Dom, DomEvent, DomMut};
use serde::Serialize;
use serde_json::json;
use tracing::trace;

/// Login flag attribute (`"true"` / `"false"`)
pub const LOGGED_IN_ATTR: &str = "data-formpilot-logged-in";
/// Extension version attribute
pub const VERSION_ATTR: &str = "data-formpilot-version";
/// Write time attribute (Unix millis)
pub const TIMESTAMP_ATTR: &str = "data-formpilot-timestamp";
/// Event dispatched on the root after every write
pub const STATUS_EVENT: &str = "formpilot:status";

/// State published through the marker channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMarker {
    /// Whether the content script's context holds a session
    pub logged_in: bool,
    /// Extension version
    pub version: String,
    /// When the marker was written
    pub timestamp: DateTime<Utc>,
}

impl PageMarker {
    /// Marker for the running build, stamped now.
    pub fn current(logged_in: bool) -> Self {
        Self {
            logged_in,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        }
    }

    /// Write the attributes and dispatch [`STATUS_EVENT`].
    pub fn write<D: DomMut + ?Sized>(&self, dom: &mut D) {
        let root = dom.root();
        let millis = self.timestamp.timestamp_millis().to_string();
        dom.set_attribute(root, LOGGED_IN_ATTR, if self.logged_in { "true" } else { "false" });
        dom.set_attribute(root, VERSION_ATTR, &self.version);
        dom.set_attribute(root, TIMESTAMP_ATTR, &millis);

        trace!(logged_in = self.logged_in, "Page marker written");
        dom.dispatch_event(DomEvent::new(
            STATUS_EVENT,
            root,
            json!({
                "loggedIn": self.logged_in,
                "version": self.version,
                "timestamp": self.timestamp.timestamp_millis(),
            }),
        ));
    }

    /// Read the marker as page code would. `None` when absent or malformed.
    pub fn read<D: Dom + ?Sized>(dom: &D) -> Option<Self> {
        let root = dom.root();
        let logged_in = match dom.attribute(root, LOGGED_IN_ATTR)? {
            "true" => true,
            "false" => false,
            _ => return None,
        };
        let version = dom.attribute(root, VERSION_ATTR)?.to_string();
        let millis: i64 = dom.attribute(root, TIMESTAMP_ATTR)?.parse().ok()?;
        let timestamp = Utc.timestamp_millis_opt(millis).single()?;

        Some(Self {
            logged_in,
            version,
            timestamp,
        })
    }

    /// Remove the attributes.
    pub fn clear<D: DomMut + ?Sized>(dom: &mut D) {
        let root = dom.root();
        for attr in [LOGGED_IN_ATTR, VERSION_ATTR, TIMESTAMP_ATTR] {
            dom.remove_attribute(root, attr);
        }
    }
}
