use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Document;
use crate::dom::{Dom, DomMut, NodeId};
use crate::error::{Error, Result};

/// Serialized page tree as produced by a content script.
///
/// A bare JSON string is a text node; an object is an element:
///
/// ```json
/// {"tag": "div", "attrs": {"class": "row"}, "children": ["Name", {"tag": "input"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSnapshot {
    /// Text node
    Text(String),
    /// Element node
    Element {
        /// Tag name
        tag: String,
        /// Attributes
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Child nodes
        #[serde(default)]
        children: Vec<NodeSnapshot>,
    },
}

impl Document {
    /// Build a document from a snapshot tree.
    ///
    /// An `<html>` root is used as-is; any other root element is wrapped in
    /// `<html><body>`.
    pub fn from_snapshot(snapshot: &NodeSnapshot) -> Result<Self> {
        let NodeSnapshot::Element {
            tag,
            attrs,
            children,
        } = snapshot
        else {
            return Err(Error::TextRoot);
        };

        let mut doc = Document::new();
        if tag.eq_ignore_ascii_case("html") {
            // Replace the default skeleton with the snapshot's own tree.
            let body = doc.body();
            doc.remove(body);
            let root = doc.root();
            for (k, v) in attrs {
                doc.set_attribute(root, k, v);
            }
            for child in children {
                doc.insert_snapshot(root, child);
            }
            doc.body = doc.elements_by_tag(root, "body").first().copied().unwrap_or(root);
        } else {
            let body = doc.body();
            doc.insert_snapshot(body, snapshot);
        }
        Ok(doc)
    }

    /// Parse a JSON snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: NodeSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }

    fn insert_snapshot(&mut self, parent: NodeId, snapshot: &NodeSnapshot) {
        match snapshot {
            NodeSnapshot::Text(text) => {
                self.append_text(parent, text);
            }
            NodeSnapshot::Element {
                tag,
                attrs,
                children,
            } => {
                let node = self.create_element(tag);
                for (k, v) in attrs {
                    self.set_attribute(node, k, v);
                }
                self.append_child(parent, node);
                for child in children {
                    self.insert_snapshot(node, child);
                }
            }
        }
    }
}
