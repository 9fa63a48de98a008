//! Document tree traits.
//!
//! The label resolver only reads through [`Dom`]. Anything that writes into a
//! page (answer injection, the status marker, the trigger element) goes
//! through [`DomMut`].

use serde::Serialize;

/// Opaque handle to a node inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

/// A custom event dispatched on a node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomEvent {
    /// Event type, e.g. `formpilot:status`
    pub name: String,
    /// Node the event was dispatched on
    pub target: NodeId,
    /// Event detail payload
    pub detail: serde_json::Value,
}

impl DomEvent {
    /// Create an event for `target`.
    pub fn new(name: impl Into<String>, target: NodeId, detail: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            target,
            detail,
        }
    }
}

/// Read-only view over a document tree.
pub trait Dom {
    /// Document root element (`<html>`).
    fn root(&self) -> NodeId;

    /// Lower-case tag name, or `None` for text nodes.
    fn tag_name(&self, node: NodeId) -> Option<&str>;

    /// Attribute value on an element.
    fn attribute(&self, node: NodeId, name: &str) -> Option<&str>;

    /// Parent node, `None` for the root or detached nodes.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Child nodes in document order.
    fn children(&self, node: NodeId) -> &[NodeId];

    /// Raw data of a text node, `None` for elements.
    fn text(&self, node: NodeId) -> Option<&str>;

    /// Whether `node` is an element with the given tag.
    fn is_tag(&self, node: NodeId, tag: &str) -> bool {
        self.tag_name(node)
            .is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Concatenated text of every descendant text node.
    fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.text(node) {
            out.push_str(text);
        }
        for descendant in self.descendants(node) {
            if let Some(text) = self.text(descendant) {
                out.push_str(text);
            }
        }
        out
    }

    /// Descendants of `node` in pre-order, excluding `node` itself.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(node).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Descendant elements of `scope` with the given tag, in document order.
    fn elements_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.is_tag(n, tag))
            .collect()
    }

    /// First element in the document whose `id` attribute equals `id`.
    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let root = self.root();
        std::iter::once(root)
            .chain(self.descendants(root))
            .find(|&n| self.attribute(n, "id") == Some(id))
    }

    /// Ancestors of `node`, nearest first, at most `max_depth` of them.
    fn ancestors(&self, node: NodeId, max_depth: usize) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(max_depth);
        let mut current = self.parent(node);
        while let Some(parent) = current {
            if out.len() >= max_depth {
                break;
            }
            out.push(parent);
            current = self.parent(parent);
        }
        out
    }
}

/// Mutating operations on a document tree.
pub trait DomMut: Dom {
    /// Set (or replace) an attribute.
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Remove an attribute if present.
    fn remove_attribute(&mut self, node: NodeId, name: &str);

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> NodeId;

    /// Append `child` as the last child of `parent`, detaching it first.
    fn append_child(&mut self, parent: NodeId, child: NodeId);

    /// Detach `node` (and its subtree) from the tree.
    fn remove(&mut self, node: NodeId);

    /// Dispatch a custom event on `target`.
    fn dispatch_event(&mut self, event: DomEvent);

    /// Write a form control's value.
    fn set_value(&mut self, node: NodeId, value: &str) {
        self.set_attribute(node, "value", value);
    }
}
