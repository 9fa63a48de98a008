//! In-memory document
//!
//! An arena-backed tree that implements both [`Dom`] and [`DomMut`]. Content
//! scripts ship pages to the engine as JSON snapshots (see [`NodeSnapshot`]);
//! tests build trees directly with [`Document::element`] and
//! [`Document::append_text`].

/// JSON snapshot format
pub mod snapshot;

use std::collections::BTreeMap;

use crate::dom::{Dom, DomEvent, DomMut, NodeId};
use crate::error::{Error, Result};

pub use snapshot::NodeSnapshot;

#[derive(Debug, Clone)]
enum NodeKind {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    root: NodeId,
    body: NodeId,
    events: Vec<DomEvent>,
}

impl Document {
    /// Create an empty `<html><body></body></html>` document.
    #[must_use]
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            events: Vec::new(),
        };
        doc.root = doc.push_element("html", BTreeMap::new());
        doc.body = doc.element(doc.root, "body", &[]);
        doc
    }

    /// The `<body>` element (or the root when a snapshot has no body).
    #[must_use]
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a new element under `parent`.
    pub fn element(&mut self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let attributes = attrs
            .iter()
            .map(|(k, v)| (k.to_ascii_lowercase(), (*v).to_string()))
            .collect();
        let id = self.push_element(tag, attributes);
        self.append_child(parent, id);
        id
    }

    /// Append a text node under `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Text(text.to_string()),
            parent: None,
            children: Vec::new(),
        });
        self.append_child(parent, id);
        id
    }

    /// Look up an element by `id`, failing if absent.
    pub fn require_by_id(&self, id: &str) -> Result<NodeId> {
        self.element_by_id(id)
            .ok_or_else(|| Error::ElementNotFound(id.to_string()))
    }

    /// Events dispatched so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[DomEvent] {
        &self.events
    }

    /// Form control value, if one has been written.
    #[must_use]
    pub fn value(&self, node: NodeId) -> Option<&str> {
        self.attribute(node, "value")
    }

    /// Whether `node` is currently reachable from the root.
    #[must_use]
    pub fn is_attached(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.root {
                return true;
            }
            current = self.parent(n);
        }
        false
    }

    fn push_element(&mut self, tag: &str, attributes: BTreeMap<String, String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
                attributes,
            },
            parent: None,
            children: Vec::new(),
        });
        id
    }

    fn node(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn detach(&mut self, node: NodeId) {
        let Some(parent) = self.node(node).and_then(|n| n.parent) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.retain(|&c| c != node);
        }
        if let Some(n) = self.nodes.get_mut(node.0) {
            n.parent = None;
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom for Document {
    fn root(&self) -> NodeId {
        self.root
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag, .. } => Some(tag),
            NodeKind::Text(_) => None,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.get(&name.to_ascii_lowercase()).map(String::as_str)
            }
            NodeKind::Text(_) => None,
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    fn children(&self, node: NodeId) -> &[NodeId] {
        self.node(node).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Text(text) => Some(text),
            NodeKind::Element { .. } => None,
        }
    }
}

impl DomMut for Document {
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        if let Some(NodeData {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            attributes.insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: NodeId, name: &str) {
        if let Some(NodeData {
            kind: NodeKind::Element { attributes, .. },
            ..
        }) = self.nodes.get_mut(node.0)
        {
            attributes.remove(&name.to_ascii_lowercase());
        }
    }

    fn create_element(&mut self, tag: &str) -> NodeId {
        self.push_element(tag, BTreeMap::new())
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        // Refuse to move a node under its own subtree.
        let mut cursor = Some(parent);
        while let Some(n) = cursor {
            if n == child {
                return;
            }
            cursor = self.parent(n);
        }
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    fn remove(&mut self, node: NodeId) {
        self.detach(node);
    }

    fn dispatch_event(&mut self, event: DomEvent) {
        tracing::trace!(event = %event.name, target = ?event.target, "Dispatching DOM event");
        self.events.push(event);
    }
}
