use super::*;
use tempfile::TempDir;

#[tokio::test]
async fn test_memory_store_roundtrip_and_feed() {
    let store = MemoryStore::new();
    let mut changes = store.subscribe().unwrap();

    store.set("sessionId", "S1").await.unwrap();
    assert_eq!(store.get("sessionId").await.unwrap().as_deref(), Some("S1"));

    let change = changes.recv().await.unwrap();
    assert_eq!(change.key, "sessionId");
    assert_eq!(change.new_value.as_deref(), Some("S1"));

    store.remove("sessionId").await.unwrap();
    let change = changes.recv().await.unwrap();
    assert_eq!(change.new_value, None);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_memory_store_remove_missing_is_silent() {
    let store = MemoryStore::new();
    let mut changes = store.subscribe().unwrap();

    store.remove("nothing").await.unwrap();
    assert!(changes.try_recv().is_err());
}

#[tokio::test]
async fn test_memory_store_without_notifications() {
    let store = MemoryStore::without_notifications();
    assert!(store.subscribe().is_none());
    store.set("k", "v").await.unwrap();
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_file_store_missing_file_is_empty() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("nested").join("storage.json"));

    assert_eq!(store.get("sessionId").await.unwrap(), None);
    store.remove("sessionId").await.unwrap();
    assert!(!store.path().exists());
}

#[tokio::test]
async fn test_file_store_shared_between_instances() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let writer = FileStore::new(&path);
    let reader = FileStore::new(&path);

    writer.set("sessionId", "S1").await.unwrap();
    writer.set("userId", "U1").await.unwrap();
    assert_eq!(reader.get("sessionId").await.unwrap().as_deref(), Some("S1"));

    reader.remove("sessionId").await.unwrap();
    assert_eq!(writer.get("sessionId").await.unwrap(), None);
    assert_eq!(writer.get("userId").await.unwrap().as_deref(), Some("U1"));
    assert!(writer.subscribe().is_none());
}

#[tokio::test]
async fn test_file_store_corrupt_file_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "{not json").unwrap();

    let store = FileStore::new(&path);
    assert!(matches!(
        store.get("sessionId").await,
        Err(crate::error::Error::Storage(_))
    ));
}

#[tokio::test]
async fn test_memory_store_clear_reports_every_key() {
    let store = MemoryStore::new();
    store.set("sessionId", "S1").await.unwrap();
    store.set("translationEnabled", "true").await.unwrap();
    let mut changes = store.subscribe().unwrap();

    store.clear().await.unwrap();
    assert!(store.is_empty().await);

    let mut cleared = vec![changes.recv().await.unwrap(), changes.recv().await.unwrap()];
    cleared.sort_by(|a, b| a.key.cmp(&b.key));
    assert_eq!(cleared[0].key, "sessionId");
    assert_eq!(cleared[1].key, "translationEnabled");
    assert!(cleared.iter().all(|c| c.new_value.is_none()));
}

#[tokio::test]
async fn test_file_store_clear() {
    let dir = TempDir::new().unwrap();
    let store = FileStore::new(dir.path().join("storage.json"));
    store.set("sessionId", "S1").await.unwrap();
    store.set("translationEnabled", "true").await.unwrap();

    store.clear().await.unwrap();
    assert_eq!(store.get("sessionId").await.unwrap(), None);
    assert_eq!(store.get("translationEnabled").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_file_store_instances_write_concurrently() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("storage.json");
    let first = FileStore::new(&path);
    let second = FileStore::new(&path);

    for i in 0..20 {
        let value = i.to_string();
        let (a, b) = tokio::join!(first.set("a", &value), second.set("b", &value));
        a.unwrap();
        b.unwrap();
    }

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
