//! Full-stack tests: `client::DataManager` against the real router, with the
//! fake key-value store standing in for the hosted one.

use serde_json::Value;

use client::{DataError, DataManager, InitOutcome, Remote, SessionState, DATA_KEY};
use store::{LocalCache, MemoryCache};

use crate::kv::KvClient;
use crate::routes::{router, AppState};
use crate::testkv::FakeKv;

const CODE: &str = "2550931665";
const TTL: u64 = 1_296_000;

async fn spawn_stack() -> (FakeKv, String) {
    let fake = FakeKv::default();
    let kv_base = fake.spawn().await;
    let state = AppState {
        kv: KvClient::new(&kv_base, "test-token"),
        code: CODE.to_string(),
        session_ttl: TTL,
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let app = router(state);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (fake, format!("http://{addr}"))
}

fn stored_notepad(fake: &FakeKv) -> Option<String> {
    let raw = fake.entry(DATA_KEY)?;
    let doc: Value = serde_json::from_str(&raw).ok()?;
    doc["notepad"].as_str().map(str::to_string)
}

#[tokio::test]
async fn verified_session_pushes_writes_through() {
    let (fake, base) = spawn_stack().await;
    let manager = DataManager::new(&base, MemoryCache::new()).unwrap();

    assert_eq!(manager.initialize().await, InitOutcome::CacheOnly);

    let code = manager.request_code().await.unwrap();
    assert_eq!(code, CODE);
    assert_eq!(manager.session_state(), SessionState::Pending);

    manager.verify_code(&code).await.unwrap();
    assert!(manager.is_authenticated());

    manager.set_notepad("hello".to_string()).await;
    assert_eq!(stored_notepad(&fake).as_deref(), Some("hello"));

    // Re-initializing over an in-sync remote never reverts local state.
    assert_eq!(manager.initialize().await, InitOutcome::RemoteInSync);
    assert_eq!(manager.notepad(), "hello");
}

#[tokio::test]
async fn wrong_code_never_authenticates_and_nothing_is_pushed() {
    let (fake, base) = spawn_stack().await;
    let manager = DataManager::new(&base, MemoryCache::new()).unwrap();
    manager.initialize().await;

    let result = manager.verify_code("not-the-code").await;
    assert!(matches!(result, Err(DataError::InvalidCode)));
    assert!(!manager.is_authenticated());

    manager.set_notepad("local only".to_string()).await;
    assert_eq!(manager.notepad(), "local only");
    assert!(fake.entry(DATA_KEY).is_none());
    assert!(fake.session_keys().is_empty());
}

#[tokio::test]
async fn initialize_applies_a_diverged_remote_document() {
    let (_fake, base) = spawn_stack().await;

    // First device writes while authenticated.
    let writer = DataManager::new(&base, MemoryCache::new()).unwrap();
    writer.initialize().await;
    writer.verify_code(CODE).await.unwrap();
    writer.set_notepad("from the other device".to_string()).await;

    // Second device authenticates, then hydrates: remote wins.
    let reader = DataManager::new(&base, MemoryCache::new()).unwrap();
    reader.verify_code(CODE).await.unwrap();
    assert_eq!(reader.initialize().await, InitOutcome::RemoteApplied);
    assert_eq!(reader.notepad(), "from the other device");

    // A third hydration over the now-matching cache is already in sync.
    let cache = MemoryCache::new();
    cache.save(&reader.document());
    let third = DataManager::new(&base, cache).unwrap();
    third.verify_code(CODE).await.unwrap();
    assert_eq!(third.initialize().await, InitOutcome::RemoteInSync);
}

#[tokio::test]
async fn evicted_session_degrades_to_local_and_recovers() {
    let (fake, base) = spawn_stack().await;
    let manager = DataManager::new(&base, MemoryCache::new()).unwrap();
    manager.initialize().await;
    manager.verify_code(CODE).await.unwrap();
    manager.set_notepad("synced".to_string()).await;

    // Store-side TTL fires: the marker disappears.
    let session_key = fake.session_keys().remove(0);
    fake.evict(&session_key);

    manager.set_notepad("after expiry".to_string()).await;
    assert_eq!(manager.notepad(), "after expiry");
    assert_eq!(manager.session_state(), SessionState::Expired);
    // The stale remote copy still holds the pre-expiry value.
    assert_eq!(stored_notepad(&fake).as_deref(), Some("synced"));

    // Only a fresh verification resumes pushing.
    manager.verify_code(CODE).await.unwrap();
    manager.set_notepad("recovered".to_string()).await;
    assert_eq!(stored_notepad(&fake).as_deref(), Some("recovered"));
}

#[tokio::test]
async fn client_pushes_slide_the_session_ttl() {
    let (fake, base) = spawn_stack().await;
    let manager = DataManager::new(&base, MemoryCache::new()).unwrap();
    manager.initialize().await;
    manager.verify_code(CODE).await.unwrap();

    let session_key = fake.session_keys().remove(0);
    manager.set_notepad("tick".to_string()).await;
    assert_eq!(fake.last_expire(&session_key), Some(TTL));
}

#[tokio::test]
async fn later_writes_win_remotely() {
    let (fake, base) = spawn_stack().await;
    let manager = DataManager::new(&base, MemoryCache::new()).unwrap();
    manager.initialize().await;
    manager.verify_code(CODE).await.unwrap();

    manager.set_notepad("first".to_string()).await;
    manager.set_notepad("second".to_string()).await;
    assert_eq!(stored_notepad(&fake).as_deref(), Some("second"));
}

#[tokio::test]
async fn remote_delete_clears_the_document_key() {
    let (fake, base) = spawn_stack().await;
    let remote = Remote::new(&base).unwrap();
    remote.verify_code(CODE).await.unwrap();

    remote.store_document(&store::AppData::default()).await.unwrap();
    assert!(fake.entry(DATA_KEY).is_some());
    assert!(remote.fetch_document().await.unwrap().is_some());

    remote.delete_key(DATA_KEY).await.unwrap();
    assert!(fake.entry(DATA_KEY).is_none());
    assert!(remote.fetch_document().await.unwrap().is_none());
}
