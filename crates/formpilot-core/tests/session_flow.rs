//! End-to-end session flow across contexts sharing one file-backed store.

use std::sync::Arc;

use formpilot_api::{ApiClient, ApiConfig};
use formpilot_core::{
    check_web_app_login, AuthFlow, ContentScript, Error, FieldAssistant, FileStore,
    KeyValueStore, MessageBus, SessionSync, Surface, SyncAgent,
};
use formpilot_dom::Document;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FORM: &str = r#"{
    "tag": "form",
    "children": [
        {"tag": "label", "attrs": {"for": "q1"}, "children": ["What is your name?"]},
        {"tag": "input", "attrs": {"id": "q1", "type": "text"}}
    ]
}"#;

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/simple/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"user_id": "U1", "email": "a@b.c"})),
        )
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/session/check-and-update/U1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": "S1"})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_propagates_and_authorizes_requests() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("POST"))
        .and(path("/api/generate-field-answer"))
        .and(header("authorization", "Bearer S1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "Jane Doe"})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("storage.json");
    let api = ApiClient::new(ApiConfig::new(server.uri())).unwrap();

    // Popup logs in
    let popup_store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&file));
    let popup = Arc::new(AuthFlow::new(
        api.clone(),
        Arc::new(SessionSync::new("popup", popup_store)),
    ));
    let session = popup.login("a@b.c", "pw").await.unwrap();
    assert!(!session.session_id.is_empty());

    // Content script on a job page sees it on its next reconcile
    let page_store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&file));
    let page_sync = Arc::new(SessionSync::new("content_script", page_store));
    assert!(page_sync.reconcile().await.unwrap().is_logged_in());

    let doc = Document::from_json(FORM).unwrap();
    let page_auth = Arc::new(AuthFlow::new(api, page_sync.clone()));
    let script = Arc::new(ContentScript::with_agent(
        doc,
        SyncAgent::with_auth(page_auth.clone()),
    ));
    script.attach().await.unwrap();

    let bus = MessageBus::default();
    bus.register(Surface::ContentScript, script.clone()).await;
    assert!(check_web_app_login(&bus, Surface::Popup).await);

    let input = script.with_dom(|dom| dom.require_by_id("q1")).unwrap();
    script.focus(input);
    let filled = script
        .autofill(&FieldAssistant::new(page_auth))
        .await
        .unwrap();

    assert_eq!(filled.descriptor.label, "What is your name?");
    script.with_dom(|dom| assert_eq!(dom.value(input), Some("Jane Doe")));
}

#[tokio::test]
async fn unauthorized_response_logs_out_every_context() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/urls/list"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("storage.json");
    let api = ApiClient::new(ApiConfig::new(server.uri())).unwrap();

    let popup = AuthFlow::new(
        api,
        Arc::new(SessionSync::new("popup", Arc::new(FileStore::new(&file)))),
    );
    popup.login("a@b.c", "pw").await.unwrap();

    let background = SessionSync::new("background", Arc::new(FileStore::new(&file)));
    assert!(background.reconcile().await.unwrap().is_logged_in());

    let tracker = formpilot_core::UrlTracker::new(Arc::new(popup));
    assert!(matches!(tracker.list().await, Err(Error::NotAuthenticated)));
    assert!(matches!(tracker.list().await, Err(Error::NotAuthenticated)));

    let event = background.reconcile().await.unwrap();
    assert!(!event.is_logged_in());
    assert!(!background.is_authenticated().await);
}
