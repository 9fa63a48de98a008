use std::ops::RangeInclusive;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use super::clean::{char_len, clean_label_text, collapse_whitespace};
use crate::dom::{Dom, NodeId};

/// Label returned when every strategy comes up empty.
pub const FALLBACK_LABEL: &str = "form field";

/// How many ancestors the enclosing/nearby/question strategies inspect.
pub const MAX_ANCESTOR_DEPTH: usize = 5;

/// Enclosing `<label>` text must be longer than this.
const MIN_ANCESTOR_LABEL_CHARS: usize = 3;

const NEARBY_LABEL_CHARS: RangeInclusive<usize> = 3..=100;

const QUESTION_TEXT_CHARS: RangeInclusive<usize> = 10..=300;

/// Capitalized statement ending in a colon, e.g. "Describe your experience:".
static STATEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][\w\s,'’()/&.-]*:$").expect("statement pattern is valid")
});

/// Which strategy produced a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelSource {
    /// `label[for=<id>]`
    Explicit,
    /// The element sits inside a `<label>`
    Ancestor,
    /// A `<label>` somewhere under a nearby ancestor
    Nearby,
    /// Question-like text near the element
    Question,
    /// `aria-label` attribute
    AriaLabel,
    /// `placeholder` attribute
    Placeholder,
    /// `name` attribute
    Name,
    /// Nothing matched
    Fallback,
}

/// A resolved label and the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLabel {
    /// Cleaned label text, never empty
    pub text: String,
    /// Winning strategy
    pub source: LabelSource,
}

/// Resolve the display label for `element`.
///
/// Never fails and never returns an empty string.
pub fn resolve_label<D: Dom + ?Sized>(dom: &D, element: NodeId) -> String {
    resolve_label_with_source(dom, element).text
}

/// Resolve the display label for `element`, reporting which strategy won.
///
/// Strategies run as full passes in priority order, so an enclosing label
/// several levels up still beats a nearby label one level up.
pub fn resolve_label_with_source<D: Dom + ?Sized>(dom: &D, element: NodeId) -> ResolvedLabel {
    let ancestors = dom.ancestors(element, MAX_ANCESTOR_DEPTH);

    let found = explicit_label(dom, element)
        .map(|t| (t, LabelSource::Explicit))
        .or_else(|| ancestor_label(dom, &ancestors).map(|t| (t, LabelSource::Ancestor)))
        .or_else(|| nearby_label(dom, &ancestors).map(|t| (t, LabelSource::Nearby)))
        .or_else(|| question_text(dom, element, &ancestors).map(|t| (t, LabelSource::Question)))
        .or_else(|| attribute_label(dom, element, "aria-label").map(|t| (t, LabelSource::AriaLabel)))
        .or_else(|| attribute_label(dom, element, "placeholder").map(|t| (t, LabelSource::Placeholder)))
        .or_else(|| name_label(dom, element).map(|t| (t, LabelSource::Name)));

    let (text, source) = found.unwrap_or_else(|| (FALLBACK_LABEL.to_string(), LabelSource::Fallback));
    debug!(source = ?source, label = %text, "Resolved field label");
    ResolvedLabel { text, source }
}

fn explicit_label<D: Dom + ?Sized>(dom: &D, element: NodeId) -> Option<String> {
    let id = dom.attribute(element, "id").filter(|id| !id.is_empty())?;
    dom.elements_by_tag(dom.root(), "label")
        .into_iter()
        .filter(|&label| dom.attribute(label, "for") == Some(id))
        .map(|label| clean_label_text(&dom.text_content(label)))
        .find(|text| !text.is_empty())
}

fn ancestor_label<D: Dom + ?Sized>(dom: &D, ancestors: &[NodeId]) -> Option<String> {
    ancestors
        .iter()
        .filter(|&&a| dom.is_tag(a, "label"))
        .map(|&a| clean_label_text(&dom.text_content(a)))
        .find(|text| char_len(text) >= MIN_ANCESTOR_LABEL_CHARS)
}

fn nearby_label<D: Dom + ?Sized>(dom: &D, ancestors: &[NodeId]) -> Option<String> {
    ancestors.iter().find_map(|&a| {
        dom.elements_by_tag(a, "label")
            .into_iter()
            .map(|label| clean_label_text(&dom.text_content(label)))
            .find(|text| NEARBY_LABEL_CHARS.contains(&char_len(text)))
    })
}

fn question_text<D: Dom + ?Sized>(dom: &D, element: NodeId, ancestors: &[NodeId]) -> Option<String> {
    ancestors.iter().find_map(|&a| {
        dom.children(a)
            .iter()
            .filter(|&&child| child != element)
            .filter(|&&child| !dom.is_tag(child, "script") && !dom.is_tag(child, "style"))
            .map(|&child| collapse_whitespace(&dom.text_content(child)))
            .find(|text| is_question_like(text))
            .map(|text| clean_label_text(&text))
    })
}

fn is_question_like(text: &str) -> bool {
    QUESTION_TEXT_CHARS.contains(&char_len(text))
        && (text.contains('?') || STATEMENT_RE.is_match(text))
}

fn attribute_label<D: Dom + ?Sized>(dom: &D, element: NodeId, name: &str) -> Option<String> {
    dom.attribute(element, name)
        .map(clean_label_text)
        .filter(|text| !text.is_empty())
}

fn name_label<D: Dom + ?Sized>(dom: &D, element: NodeId) -> Option<String> {
    dom.attribute(element, "name")
        .map(|name| clean_label_text(&name.replace(['_', '-'], " ")))
        .filter(|text| !text.is_empty())
}
