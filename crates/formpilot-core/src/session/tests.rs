use super::*;
use crate::storage::MemoryStore;

#[tokio::test]
async fn test_store_and_load() {
    let store = MemoryStore::new();
    let session = Session::new("S1", "U1", Some("a@b.c".to_string()));

    session.store(&store).await.unwrap();
    assert_eq!(Session::load(&store).await.unwrap(), Some(session));
}

#[test]
fn test_email_is_optional() {
    tokio_test::block_on(async {
        let store = MemoryStore::new();
        tokio_test::assert_ok!(store.set(keys::SESSION_ID, "S1").await);
        tokio_test::assert_ok!(store.set(keys::USER_ID, "U1").await);

        let session = Session::load(&store).await.unwrap().unwrap();
        assert_eq!(session.email, None);
    });
}

#[tokio::test]
async fn test_missing_user_id_is_no_session() {
    let store = MemoryStore::new();
    store.set(keys::SESSION_ID, "S1").await.unwrap();
    store.set(keys::USER_ID, "  ").await.unwrap();

    assert_eq!(Session::load(&store).await.unwrap(), None);
}

#[tokio::test]
async fn test_legacy_keys_are_read() {
    let store = MemoryStore::new();
    store.set("session_id", "S-old").await.unwrap();
    store.set("user_id", "U-old").await.unwrap();
    store.set("user_email", "old@b.c").await.unwrap();

    let session = Session::load(&store).await.unwrap().unwrap();
    assert_eq!(session, Session::new("S-old", "U-old", Some("old@b.c".to_string())));
}

#[tokio::test]
async fn test_canonical_keys_win_over_legacy() {
    let store = MemoryStore::new();
    store.set("session_id", "S-old").await.unwrap();
    store.set(keys::SESSION_ID, "S-new").await.unwrap();
    store.set(keys::USER_ID, "U1").await.unwrap();

    let session = Session::load(&store).await.unwrap().unwrap();
    assert_eq!(session.session_id, "S-new");
}

#[tokio::test]
async fn test_erase_clears_canonical_and_legacy() {
    let store = MemoryStore::new();
    Session::new("S1", "U1", Some("a@b.c".to_string()))
        .store(&store)
        .await
        .unwrap();
    store.set("session_id", "S-old").await.unwrap();
    store.set(keys::TRANSLATION_ENABLED, "true").await.unwrap();

    Session::erase(&store).await.unwrap();

    assert_eq!(Session::load(&store).await.unwrap(), None);
    assert_eq!(store.get("session_id").await.unwrap(), None);
    assert_eq!(store.get(keys::EMAIL).await.unwrap(), None);
    // Preferences survive logout
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_store_without_email_drops_stale_email() {
    let store = MemoryStore::new();
    Session::new("S1", "U1", Some("old@b.c".to_string()))
        .store(&store)
        .await
        .unwrap();
    Session::new("S2", "U2", None).store(&store).await.unwrap();

    assert_eq!(store.get(keys::EMAIL).await.unwrap(), None);
}

#[test]
fn test_key_helpers() {
    assert_eq!(keys::legacy_alias(keys::EMAIL), Some("user_email"));
    assert_eq!(keys::legacy_alias(keys::TRANSLATION_ENABLED), None);
    assert!(keys::is_session_key("user_id"));
    assert!(keys::is_session_key(keys::SESSION_ID));
    assert!(!keys::is_session_key(keys::TRANSLATION_ENABLED));
}

#[test]
fn test_auth_state_from_option() {
    assert_eq!(AuthState::from(None), AuthState::LoggedOut);
    let state = AuthState::from(Some(Session::new("S1", "U1", None)));
    assert!(state.is_logged_in());
    assert_eq!(state.session().unwrap().user_id, "U1");
}

#[test]
fn test_session_wire_format_is_camel_case() {
    let json = serde_json::to_value(Session::new("S1", "U1", None)).unwrap();
    assert_eq!(json["sessionId"], "S1");
    assert_eq!(json["userId"], "U1");
}
