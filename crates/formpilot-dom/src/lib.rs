//! FormPilot DOM - field label resolution
//!
//! This crate provides:
//! - Dom: read-only view over a document tree, plus `DomMut` for writers
//! - Document: in-memory arena document, loadable from a JSON snapshot
//! - Label: the field label cascade and text cleanup
//! - FieldDescriptor: label + bounded context captured per focus event

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod document;
pub mod dom;
pub mod error;
pub mod label;

pub use document::{Document, NodeSnapshot};
pub use dom::{Dom, DomEvent, DomMut, NodeId};
pub use error::{Error, Result};
pub use label::{
    clean_label_text, resolve_label, FieldDescriptor, FALLBACK_LABEL, MAX_ANCESTOR_DEPTH,
    MAX_CONTEXT_CHARS,
};
