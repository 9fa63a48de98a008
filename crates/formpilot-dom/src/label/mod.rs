//! Label - field label resolution
//!
//! Maps a focused `<input>`/`<textarea>` to the most human-readable label
//! available, trying a fixed cascade of strategies (explicit `label[for]`,
//! enclosing label, nearby label, question-like text, `aria-label`,
//! `placeholder`, `name`) and falling back to [`FALLBACK_LABEL`].
//!
//! Bounds are shared by every caller:
//!
//! | bound | value |
//! |---|---|
//! | ancestor walk | [`MAX_ANCESTOR_DEPTH`] levels |
//! | enclosing label | more than 2 chars |
//! | nearby label | 3..=100 chars |
//! | question-like text | 10..=300 chars |
//! | context snippet | [`MAX_CONTEXT_CHARS`] chars |

/// Label text normalization
pub mod clean;
/// Per-focus field descriptor
pub mod descriptor;
/// The strategy cascade
pub mod resolver;

pub use clean::{clean_label_text, collapse_whitespace};
pub use descriptor::{FieldDescriptor, MAX_CONTEXT_CHARS};
pub use resolver::{
    resolve_label, resolve_label_with_source, LabelSource, ResolvedLabel, FALLBACK_LABEL,
    MAX_ANCESTOR_DEPTH,
};
