//! Integration tests for FormPilot
//!
//! These tests load page snapshots the way `formpilot label` and
//! `formpilot fill` do and check the crates agree with each other:
//! - formpilot-dom: snapshot loading and the label cascade
//! - formpilot-core: content-script state over the loaded page

use std::sync::Arc;

use formpilot_core::{
    ContentScript, ExtensionMessage, MemoryStore, MessageHandler, MessageResponse, PageMarker,
    SessionSync, Surface, TRIGGER_ELEMENT_ID,
};
use formpilot_dom::{resolve_label, Document, Dom, FieldDescriptor, FALLBACK_LABEL};

const APPLICATION_PAGE: &str = r#"{
    "tag": "html",
    "children": [
        {"tag": "body", "children": [
            {"tag": "form", "attrs": {"id": "apply"}, "children": [
                {"tag": "label", "attrs": {"for": "full-name"}, "children": [" Full Name: * "]},
                {"tag": "input", "attrs": {"id": "full-name", "type": "text"}},

                {"tag": "label", "children": [
                    "Email address",
                    {"tag": "input", "attrs": {"id": "email", "type": "email"}}
                ]},

                {"tag": "textarea", "attrs": {"id": "cover-letter"}}
            ]}
        ]}
    ]
}"#;

fn page() -> Document {
    Document::from_json(APPLICATION_PAGE).unwrap()
}

fn label_of(doc: &Document, id: &str) -> String {
    resolve_label(doc, doc.require_by_id(id).unwrap())
}

fn label_in(snapshot: &str, id: &str) -> String {
    label_of(&Document::from_json(snapshot).unwrap(), id)
}

// ============================================================================
// Label cascade over a snapshot
// ============================================================================

#[test]
fn test_explicit_label_is_cleaned() {
    assert_eq!(label_of(&page(), "full-name"), "Full Name");
}

#[test]
fn test_enclosing_label() {
    assert_eq!(label_of(&page(), "email"), "Email address");
}

#[test]
fn test_nearby_label_beats_attributes() {
    // The form's own labels sit under a shared ancestor
    assert_eq!(label_of(&page(), "cover-letter"), "Full Name");
}

#[test]
fn test_question_text_beside_textarea() {
    let snapshot = r#"{"tag": "div", "children": [
        {"tag": "p", "children": ["Why do you want to work here?"]},
        {"tag": "textarea", "attrs": {"id": "motivation"}}
    ]}"#;
    assert_eq!(label_in(snapshot, "motivation"), "Why do you want to work here?");
}

#[test]
fn test_attribute_fallbacks() {
    assert_eq!(
        label_in(r#"{"tag": "input", "attrs": {"id": "phone", "aria-label": "Phone number"}}"#, "phone"),
        "Phone number"
    );
    assert_eq!(
        label_in(r#"{"tag": "input", "attrs": {"id": "li", "name": "linkedin_profile-url"}}"#, "li"),
        "linkedin profile url"
    );
}

#[test]
fn test_unlabeled_field_gets_fallback() {
    assert_eq!(
        label_in(r#"{"tag": "input", "attrs": {"id": "lonely"}}"#, "lonely"),
        FALLBACK_LABEL
    );
}

#[test]
fn test_missing_field_id_is_an_error() {
    assert!(page().require_by_id("nope").is_err());
}

#[test]
fn test_descriptor_serializes_for_json_output() {
    let doc = page();
    let descriptor = FieldDescriptor::capture(&doc, doc.require_by_id("email").unwrap());
    let value = serde_json::to_value(&descriptor).unwrap();

    assert_eq!(value["label"], "Email address");
    assert_eq!(value["label_source"], "ancestor");
    assert_eq!(value["field_type"], "email");
}

// ============================================================================
// Content script over a snapshot
// ============================================================================

#[tokio::test]
async fn test_content_script_fills_snapshot_field() {
    let doc = page();
    let cover_letter = doc.require_by_id("cover-letter").unwrap();

    let sync = Arc::new(SessionSync::new("content_script", Arc::new(MemoryStore::new())));
    let script = ContentScript::new(doc, sync);
    script.attach().await.unwrap();
    script.focus(cover_letter);

    let response = script
        .handle(
            Surface::Background,
            ExtensionMessage::FillField {
                answer: "I like the product.".to_string(),
            },
        )
        .await;
    assert_eq!(response, MessageResponse::Ack);

    script.with_dom(|dom| {
        assert_eq!(dom.value(cover_letter), Some("I like the product."));
        assert!(dom.element_by_id(TRIGGER_ELEMENT_ID).is_some());
        assert!(!PageMarker::read(&*dom).unwrap().logged_in);
    });
}
