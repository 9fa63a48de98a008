use serde::Serialize;

use super::clean::{char_len, collapse_whitespace};
use super::resolver::{resolve_label_with_source, LabelSource, MAX_ANCESTOR_DEPTH};
use crate::dom::{Dom, NodeId};

/// Maximum length of the surrounding-text snippet sent with a field.
pub const MAX_CONTEXT_CHARS: usize = 500;

/// Everything the backend needs to answer one focused field.
///
/// Recomputed on every focus event; holds the node handle but never the
/// document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescriptor {
    /// Focused input/textarea
    pub element: NodeId,
    /// Resolved label
    pub label: String,
    /// Strategy that produced `label`
    pub label_source: LabelSource,
    /// Surrounding text, at most [`MAX_CONTEXT_CHARS`] chars
    pub context: String,
    /// `type` attribute, or the tag name for textareas/selects
    pub field_type: String,
    /// Placeholder text, if any
    pub placeholder: Option<String>,
}

impl FieldDescriptor {
    /// Capture the descriptor for `element` from the current DOM.
    pub fn capture<D: Dom + ?Sized>(dom: &D, element: NodeId) -> Self {
        let resolved = resolve_label_with_source(dom, element);
        let context = surrounding_text(dom, element, &resolved.text);
        let field_type = dom
            .attribute(element, "type")
            .filter(|t| !t.is_empty())
            .or_else(|| dom.tag_name(element))
            .unwrap_or("text")
            .to_ascii_lowercase();
        let placeholder = dom
            .attribute(element, "placeholder")
            .map(collapse_whitespace)
            .filter(|p| !p.is_empty());

        Self {
            element,
            label: resolved.text,
            label_source: resolved.source,
            context,
            field_type,
            placeholder,
        }
    }
}

/// Text of the nearest ancestor that says more than the label alone.
fn surrounding_text<D: Dom + ?Sized>(dom: &D, element: NodeId, label: &str) -> String {
    dom.ancestors(element, MAX_ANCESTOR_DEPTH)
        .into_iter()
        .map(|a| collapse_whitespace(&dom.text_content(a)))
        .find(|text| char_len(text) > char_len(label))
        .map(|text| truncate_chars(&text, MAX_CONTEXT_CHARS))
        .unwrap_or_default()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
