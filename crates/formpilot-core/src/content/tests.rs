use super::*;
use crate::marker::LOGGED_IN_ATTR;
use crate::session::{keys, Session};
use crate::storage::{KeyValueStore, MemoryStore};
use formpilot_dom::{Document, Dom};

fn page() -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.body();
    let label = doc.element(body, "label", &[]);
    doc.append_text(label, "Email address");
    let input = doc.element(label, "input", &[("type", "email")]);
    (doc, input)
}

fn script(doc: Document) -> (ContentScript<Document>, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let sync = Arc::new(SessionSync::new("content_script", store.clone()));
    (ContentScript::new(doc, sync), store)
}

#[tokio::test]
async fn test_attach_injects_trigger_and_marker() {
    let (doc, _input) = page();
    let (script, _store) = script(doc);

    script.attach().await.unwrap();
    assert!(script.is_attached());

    script.with_dom(|dom| {
        let trigger = dom.element_by_id(TRIGGER_ELEMENT_ID).unwrap();
        assert_eq!(dom.tag_name(trigger), Some("div"));
        assert_eq!(dom.parent(trigger), Some(dom.body()));
        assert_eq!(dom.attribute(dom.root(), LOGGED_IN_ATTR), Some("false"));
    });

    // Attaching twice does not inject a second trigger
    let first = script.trigger();
    script.attach().await.unwrap();
    assert_eq!(script.trigger(), first);
    script.with_dom(|dom| {
        let triggers = dom
            .elements_by_tag(dom.root(), "div")
            .into_iter()
            .filter(|n| dom.attribute(*n, "id") == Some(TRIGGER_ELEMENT_ID))
            .count();
        assert_eq!(triggers, 1);
    });
}

#[tokio::test]
async fn test_detach_tears_down() {
    let (doc, input) = page();
    let (script, _store) = script(doc);
    script.attach().await.unwrap();
    script.focus(input);

    script.detach();

    assert!(!script.is_attached());
    assert_eq!(script.focused(), None);
    script.with_dom(|dom| {
        assert_eq!(dom.element_by_id(TRIGGER_ELEMENT_ID), None);
        assert_eq!(PageMarker::read(&*dom), None);
    });
}

#[tokio::test]
async fn test_fill_field_message_targets_focus() {
    let (doc, input) = page();
    let (script, _store) = script(doc);

    let response = script
        .handle(
            Surface::Background,
            ExtensionMessage::FillField {
                answer: "jane@example.com".to_string(),
            },
        )
        .await;
    assert!(matches!(response, MessageResponse::Error { .. }));

    script.focus(input);
    let response = script
        .handle(
            Surface::Background,
            ExtensionMessage::FillField {
                answer: "jane@example.com".to_string(),
            },
        )
        .await;
    assert_eq!(response, MessageResponse::Ack);
    script.with_dom(|dom| assert_eq!(dom.value(input), Some("jane@example.com")));
}

#[tokio::test]
async fn test_descriptor_uses_enclosing_label() {
    let (doc, input) = page();
    let (script, _store) = script(doc);
    assert!(matches!(script.descriptor(), Err(Error::NoFocusedField)));

    script.focus(input);
    let descriptor = script.descriptor().unwrap();
    assert_eq!(descriptor.label, "Email address");
    assert_eq!(descriptor.field_type, "email");
}

#[tokio::test]
async fn test_session_messages_refresh_marker_and_notify_once() {
    let (doc, _input) = page();
    let (script, _store) = script(doc);
    script.attach().await.unwrap();

    let response = script
        .handle(
            Surface::Background,
            ExtensionMessage::SyncSession {
                session: Session::new("S1", "U1", None),
            },
        )
        .await;
    assert_eq!(response, MessageResponse::Ack);
    script.with_dom(|dom| assert!(PageMarker::read(&*dom).unwrap().logged_in));

    // syncSession already published the logged-in state
    assert!(!script.refresh_marker().await);

    script
        .handle(Surface::Popup, ExtensionMessage::ClearSession)
        .await;
    script.with_dom(|dom| assert!(!PageMarker::read(&*dom).unwrap().logged_in));
}

#[tokio::test]
async fn test_translation_toggle_updates_state_and_store() {
    let (doc, _input) = page();
    let (script, store) = script(doc);
    store.set(keys::TRANSLATION_ENABLED, "true").await.unwrap();

    script.attach().await.unwrap();
    assert!(script.translation_enabled());

    script
        .handle(Surface::Popup, ExtensionMessage::ToggleTranslation { enabled: false })
        .await;
    assert!(!script.translation_enabled());
    assert_eq!(
        store.get(keys::TRANSLATION_ENABLED).await.unwrap().as_deref(),
        Some("false")
    );
}

#[tokio::test]
async fn test_clear_storage_resets_translation_and_marker() {
    let (doc, _input) = page();
    let (script, store) = script(doc);
    store.set(keys::TRANSLATION_ENABLED, "true").await.unwrap();
    Session::new("S1", "U1", None).store(store.as_ref()).await.unwrap();

    script.attach().await.unwrap();
    assert!(script.translation_enabled());

    let response = script
        .handle(Surface::Popup, ExtensionMessage::ClearStorage)
        .await;
    assert_eq!(response, MessageResponse::Ack);
    assert!(!script.translation_enabled());
    assert_eq!(store.get(keys::TRANSLATION_ENABLED).await.unwrap(), None);
    script.with_dom(|dom| assert!(!PageMarker::read(&*dom).unwrap().logged_in));
}
