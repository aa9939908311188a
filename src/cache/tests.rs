use super::*;
use crate::hashing::Signature;
use std::sync::Arc;
use tempfile::TempDir;

fn sig(byte: u8) -> Signature {
    Signature::from_bytes([byte; 32])
}

#[tokio::test]
async fn test_memory_store_round_trip() {
    let store = MemoryMessageStore::new();

    store.store(&sig(1), "안녕하세요").await.unwrap();

    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("안녕하세요"));
}

#[tokio::test]
async fn test_memory_store_miss() {
    let store = MemoryMessageStore::new();
    assert!(store.lookup(&sig(9)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_memory_store_first_match_wins() {
    let store = MemoryMessageStore::new();

    store.store(&sig(1), "first").await.unwrap();
    store.store(&sig(1), "second").await.unwrap();

    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("first"));
    assert_eq!(store.entries(&sig(1)).len(), 2);
    assert_eq!(store.len(), 2);
}

#[tokio::test]
async fn test_memory_store_keeps_signatures_apart() {
    let store = MemoryMessageStore::new();

    store.store(&sig(1), "one").await.unwrap();
    store.store(&sig(2), "two").await.unwrap();

    assert_eq!(store.lookup(&sig(2)).await.unwrap().as_deref(), Some("two"));
}

#[tokio::test]
async fn test_memory_store_concurrent_appends() {
    let store = Arc::new(MemoryMessageStore::new());

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move { store.store(&sig(7), &format!("m{i}")).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(store.entries(&sig(7)).len(), 16);
    assert!(store.lookup(&sig(7)).await.unwrap().is_some());
}

#[test]
fn test_cache_entry_records_signature() {
    let entry = CacheEntry::new(&sig(3), "msg");
    assert_eq!(entry.signature(), sig(3));
    assert!(entry.created_at > 0);
}

#[test]
fn test_cache_entry_rkyv_round_trip() {
    use rkyv::rancor::Error;

    let entry = CacheEntry::new(&sig(4), "메시지 {{customer_name}}");
    let bytes = rkyv::to_bytes::<Error>(&entry).unwrap();
    let restored: CacheEntry = rkyv::from_bytes::<CacheEntry, Error>(&bytes).unwrap();

    assert_eq!(restored, entry);
}

#[tokio::test]
async fn test_file_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();

    store.store(&sig(1), "hello").await.unwrap();

    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_file_store_first_match_wins() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();

    store.store(&sig(1), "first").await.unwrap();
    store.store(&sig(1), "second").await.unwrap();
    store.store(&sig(1), "third").await.unwrap();

    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("first"));
    assert_eq!(store.entry_paths(&sig(1)).unwrap().len(), 3);
}

#[tokio::test]
async fn test_file_store_miss_without_directory() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();

    assert!(store.lookup(&sig(5)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_survives_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = FileMessageStore::open(dir.path()).unwrap();
        store.store(&sig(2), "persisted").await.unwrap();
    }

    let reopened = FileMessageStore::open(dir.path()).unwrap();

    assert_eq!(reopened.lookup(&sig(2)).await.unwrap().as_deref(), Some("persisted"));
}

#[tokio::test]
async fn test_file_store_layout_uses_signature_hex() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();

    store.store(&sig(0xab), "x").await.unwrap();

    let paths = store.entry_paths(&sig(0xab)).unwrap();
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with(dir.path().join(sig(0xab).to_hex())));
    assert_eq!(paths[0].extension().and_then(|e| e.to_str()), Some("rkyv"));
}

fn plant_garbage(root: &std::path::Path, signature: &Signature) {
    let sig_dir = root.join(signature.to_hex());
    std::fs::create_dir_all(&sig_dir).unwrap();
    std::fs::write(sig_dir.join("0000000000000000-0000000000-x.rkyv"), b"garbage").unwrap();
}

#[tokio::test]
async fn test_file_store_corrupt_entry_alone_is_a_miss() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();
    plant_garbage(dir.path(), &sig(6));

    assert!(store.lookup(&sig(6)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_file_store_skips_corrupt_oldest_entry() {
    let dir = TempDir::new().unwrap();
    let store = FileMessageStore::open(dir.path()).unwrap();
    plant_garbage(dir.path(), &sig(6));

    store.store(&sig(6), "recovered").await.unwrap();

    assert_eq!(store.lookup(&sig(6)).await.unwrap().as_deref(), Some("recovered"));
    assert_eq!(store.lookup(&sig(6)).await.unwrap().as_deref(), Some("recovered"));
    assert_eq!(store.entry_paths(&sig(6)).unwrap().len(), 2);
}

#[tokio::test]
async fn test_file_store_orders_after_entries_from_a_later_clock() {
    let dir = TempDir::new().unwrap();
    {
        let store = FileMessageStore::open(dir.path()).unwrap();
        store.store(&sig(7), "first").await.unwrap();
        let path = store.entry_paths(&sig(7)).unwrap().remove(0);
        // An entry written by a process whose clock ran far ahead.
        std::fs::rename(
            &path,
            path.with_file_name("9999999999999999-0000000042-ahead.rkyv"),
        )
        .unwrap();
    }

    let reopened = FileMessageStore::open(dir.path()).unwrap();
    reopened.store(&sig(7), "second").await.unwrap();

    let paths = reopened.entry_paths(&sig(7)).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].to_string_lossy().contains("ahead"));
    assert_eq!(reopened.lookup(&sig(7)).await.unwrap().as_deref(), Some("first"));
}

#[tokio::test]
async fn test_front_cache_serves_repeat_lookups() {
    let inner = Arc::new(MockMessageStore::new());
    let store = CachedMessageStore::new(inner.clone());

    store.store(&sig(1), "cached").await.unwrap();
    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("cached"));
    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("cached"));

    assert_eq!(inner.lookup_count(), 1);
    assert_eq!(store.front_len(), 1);
}

#[tokio::test]
async fn test_front_cache_does_not_memoize_misses() {
    let inner = Arc::new(MockMessageStore::new());
    let store = CachedMessageStore::new(inner.clone());

    assert!(store.lookup(&sig(1)).await.unwrap().is_none());
    store.store(&sig(1), "later").await.unwrap();

    assert_eq!(store.lookup(&sig(1)).await.unwrap().as_deref(), Some("later"));
}

#[tokio::test]
async fn test_mock_store_failure_switches() {
    let store = MockMessageStore::new();
    store.set_fail_stores(true);

    assert!(store.store(&sig(1), "x").await.is_err());
    assert_eq!(store.store_count(), 1);
    assert!(store.inner().is_empty());

    store.set_fail_lookups(true);
    assert!(matches!(store.lookup(&sig(1)).await, Err(CacheError::Unavailable { .. })));
}

#[tokio::test]
async fn test_build_message_store_in_memory() {
    let store = build_message_store(None, 16).unwrap();

    store.store(&sig(8), "m").await.unwrap();

    assert_eq!(store.lookup(&sig(8)).await.unwrap().as_deref(), Some("m"));
    assert_eq!(store.name(), "memory");
}

#[tokio::test]
async fn test_build_message_store_file_backed() {
    let dir = TempDir::new().unwrap();
    let store = build_message_store(Some(dir.path().join("cache")), 16).unwrap();

    store.store(&sig(8), "m").await.unwrap();

    assert_eq!(store.name(), "file");
    assert!(dir.path().join("cache").join(sig(8).to_hex()).is_dir());
}
