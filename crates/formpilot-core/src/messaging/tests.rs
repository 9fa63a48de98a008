use super::*;
use crate::error::Error;
use crate::session::{keys, Session};
use crate::storage::{KeyValueStore, MemoryStore};
use crate::sync::SessionSync;
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Never answers within any reasonable timeout.
struct SlowHandler;

#[async_trait]
impl MessageHandler for SlowHandler {
    async fn handle(&self, _from: Surface, _message: ExtensionMessage) -> MessageResponse {
        tokio::time::sleep(Duration::from_secs(60)).await;
        MessageResponse::Ack
    }
}

/// Forwards everything it receives.
struct Recorder(mpsc::UnboundedSender<(Surface, ExtensionMessage)>);

#[async_trait]
impl MessageHandler for Recorder {
    async fn handle(&self, from: Surface, message: ExtensionMessage) -> MessageResponse {
        let _ = self.0.send((from, message));
        MessageResponse::Ack
    }
}

fn agent() -> (SyncAgent, Arc<dyn KeyValueStore>) {
    let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
    let sync = Arc::new(SessionSync::new("content_script", store.clone()));
    (SyncAgent::new(sync), store)
}

#[test]
fn test_parse_tagged_messages() {
    assert_eq!(
        ExtensionMessage::parse(json!({"action": "getAuthStatus"})).unwrap(),
        ExtensionMessage::GetAuthStatus
    );
    assert_eq!(
        ExtensionMessage::parse(json!({"action": "toggleTranslation", "enabled": true})).unwrap(),
        ExtensionMessage::ToggleTranslation { enabled: true }
    );

    let sync = ExtensionMessage::from_json(
        r#"{"action":"syncSession","session":{"sessionId":"S1","userId":"U1"}}"#,
    )
    .unwrap();
    assert_eq!(sync.action(), "syncSession");
    assert_eq!(
        sync,
        ExtensionMessage::SyncSession {
            session: Session::new("S1", "U1", None)
        }
    );
}

#[test]
fn test_parse_rejects_bad_payloads() {
    for payload in [
        json!({"action": "launchRockets"}),
        json!({"type": "getAuthStatus"}),
        json!({"action": "toggleTranslation"}),
        json!({"action": "fillField", "answer": 3}),
        json!({"action": "syncSession", "session": {"sessionId": "", "userId": "U1"}}),
        json!({"action": "register", "email": " ", "password": "pw"}),
    ] {
        assert!(
            matches!(ExtensionMessage::parse(payload.clone()), Err(Error::InvalidMessage(_))),
            "accepted {}",
            payload
        );
    }
    assert!(ExtensionMessage::from_json("not json").is_err());
}

#[test]
fn test_response_wire_shape() {
    let response = MessageResponse::AuthStatus {
        logged_in: true,
        user_id: Some("U1".to_string()),
        email: None,
    };
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"status": "auth_status", "logged_in": true, "user_id": "U1"})
    );
    assert!(response.is_logged_in());
    assert!(!MessageResponse::Ack.is_logged_in());
    assert_eq!(Surface::ContentScript.to_string(), "content_script");
}

#[tokio::test(start_paused = true)]
async fn test_request_times_out_to_failure() {
    let bus = MessageBus::default();
    bus.register(Surface::ContentScript, Arc::new(SlowHandler)).await;

    let started = tokio::time::Instant::now();
    let result = bus
        .request(Surface::Popup, Surface::ContentScript, ExtensionMessage::GetAuthStatus)
        .await;

    assert!(matches!(result, Err(Error::Timeout(3000))));
    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert!(started.elapsed() < Duration::from_millis(3100));
    assert!(!check_web_app_login(&bus, Surface::Popup).await);
}

#[tokio::test]
async fn test_request_without_receiver() {
    let bus = MessageBus::new(Duration::from_millis(100));
    let result = bus
        .request(Surface::Popup, Surface::Background, ExtensionMessage::Logout)
        .await;
    assert!(matches!(result, Err(Error::NoReceiver(ref s)) if s == "background"));
    assert!(!bus.send(Surface::Popup, Surface::Background, ExtensionMessage::Logout).await);
}

#[tokio::test]
async fn test_check_web_app_login_reads_content_script_state() {
    let (agent, store) = agent();
    let bus = MessageBus::default();
    bus.register(Surface::ContentScript, Arc::new(agent)).await;
    assert!(!check_web_app_login(&bus, Surface::Popup).await);

    Session::new("S1", "U1", None).store(store.as_ref()).await.unwrap();
    assert!(check_web_app_login(&bus, Surface::Popup).await);
}

#[tokio::test]
async fn test_send_and_broadcast_deliver() {
    let bus = MessageBus::default();
    let (tx, mut rx) = mpsc::unbounded_channel();
    bus.register(Surface::Background, Arc::new(Recorder(tx.clone()))).await;
    bus.register(Surface::Popup, Arc::new(Recorder(tx))).await;

    assert!(
        bus.send(Surface::Page, Surface::Background, ExtensionMessage::AuthenticationUpdated)
            .await
    );
    let (from, message) = rx.recv().await.unwrap();
    assert_eq!(from, Surface::Page);
    assert_eq!(message, ExtensionMessage::AuthenticationUpdated);

    // The sender does not hear its own broadcast
    assert_eq!(bus.broadcast(Surface::Popup, ExtensionMessage::ClearSession).await, 1);
    assert_eq!(rx.recv().await.unwrap().0, Surface::Popup);

    assert!(bus.unregister(Surface::Popup).await);
    assert!(!bus.is_registered(Surface::Popup).await);
}

#[tokio::test]
async fn test_agent_sync_and_clear() {
    let (agent, store) = agent();

    let response = agent
        .handle(
            Surface::Background,
            ExtensionMessage::SyncSession {
                session: Session::new("S1", "U1", Some("a@b.c".to_string())),
            },
        )
        .await;
    assert_eq!(response, MessageResponse::Ack);
    assert_eq!(store.get(keys::SESSION_ID).await.unwrap().as_deref(), Some("S1"));

    let status = agent.handle(Surface::Popup, ExtensionMessage::GetAuthStatus).await;
    assert_eq!(
        status,
        MessageResponse::AuthStatus {
            logged_in: true,
            user_id: Some("U1".to_string()),
            email: Some("a@b.c".to_string()),
        }
    );

    assert_eq!(
        agent.handle(Surface::Popup, ExtensionMessage::ClearStorage).await,
        MessageResponse::Ack
    );
    assert!(!agent.handle(Surface::Popup, ExtensionMessage::GetAuthStatus).await.is_logged_in());
}

#[tokio::test]
async fn test_agent_clear_storage_wipes_settings_too() {
    let (agent, store) = agent();
    Session::new("S1", "U1", None).store(store.as_ref()).await.unwrap();
    store.set(keys::TRANSLATION_ENABLED, "true").await.unwrap();

    assert_eq!(
        agent.handle(Surface::Popup, ExtensionMessage::ClearSession).await,
        MessageResponse::Ack
    );
    assert_eq!(store.get(keys::SESSION_ID).await.unwrap(), None);
    assert_eq!(
        store.get(keys::TRANSLATION_ENABLED).await.unwrap().as_deref(),
        Some("true")
    );

    assert_eq!(
        agent.handle(Surface::Popup, ExtensionMessage::ClearStorage).await,
        MessageResponse::Ack
    );
    assert_eq!(store.get(keys::TRANSLATION_ENABLED).await.unwrap(), None);
}

#[tokio::test]
async fn test_agent_logout_without_backend_clears_locally() {
    let (agent, store) = agent();
    Session::new("S1", "U1", None).store(store.as_ref()).await.unwrap();

    assert_eq!(
        agent.handle(Surface::Popup, ExtensionMessage::Logout).await,
        MessageResponse::Ack
    );
    assert_eq!(store.get(keys::USER_ID).await.unwrap(), None);
}

#[tokio::test]
async fn test_agent_authentication_updated_reconciles() {
    let (agent, store) = agent();
    let mut events = agent.sync().subscribe();
    Session::new("S1", "U1", None).store(store.as_ref()).await.unwrap();

    let response = agent
        .handle(Surface::Page, ExtensionMessage::AuthenticationUpdated)
        .await;
    assert!(response.is_logged_in());
    assert!(events.try_recv().unwrap().is_logged_in());
}

#[tokio::test]
async fn test_agent_persists_translation_flag() {
    let (agent, store) = agent();
    agent
        .handle(Surface::Popup, ExtensionMessage::ToggleTranslation { enabled: true })
        .await;
    assert_eq!(
        store.get(keys::TRANSLATION_ENABLED).await.unwrap().as_deref(),
        Some("true")
    );
}

#[tokio::test]
async fn test_agent_refuses_backend_actions_without_auth() {
    let (agent, _store) = agent();
    for message in [
        ExtensionMessage::Register {
            email: "a@b.c".to_string(),
            password: "pw".to_string(),
        },
        ExtensionMessage::ValidateSession,
        ExtensionMessage::FillField {
            answer: "x".to_string(),
        },
    ] {
        assert!(matches!(
            agent.handle(Surface::Popup, message).await,
            MessageResponse::Error { .. }
        ));
    }
}
