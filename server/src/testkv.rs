//! In-process stand-in for the remote key-value store, used by tests.
//!
//! Speaks the same REST surface as the real store and records every `expire`
//! call so tests can assert sliding-expiration behavior.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct FakeKv {
    entries: Arc<Mutex<HashMap<String, String>>>,
    expires: Arc<Mutex<Vec<(String, u64)>>>,
}

impl FakeKv {
    /// Raw stored text for `key`, if any.
    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Remove `key` out-of-band, simulating store-side TTL expiry.
    pub fn evict(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }

    /// The most recent `expire` TTL recorded for `key`.
    pub fn last_expire(&self, key: &str) -> Option<u64> {
        self.expires
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, ttl)| *ttl)
    }

    /// How many `expire` calls `key` has received.
    pub fn expire_count(&self, key: &str) -> usize {
        self.expires
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| k == key)
            .count()
    }

    /// Keys of all live session markers.
    pub fn session_keys(&self) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .keys()
            .filter(|k| k.starts_with("homepage_session_"))
            .cloned()
            .collect()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/get/:key", get(kv_get))
            .route("/set/:key", post(kv_set))
            .route("/del/:key", post(kv_del))
            .route("/expire/:key/:ttl", post(kv_expire))
            .with_state(self.clone())
    }

    /// Serve on an ephemeral port and return the base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

async fn kv_get(State(kv): State<FakeKv>, Path(key): Path<String>) -> Json<Value> {
    let value = kv.entries.lock().unwrap().get(&key).cloned();
    Json(json!({ "result": value }))
}

async fn kv_set(
    State(kv): State<FakeKv>,
    Path(key): Path<String>,
    body: String,
) -> Json<Value> {
    kv.entries.lock().unwrap().insert(key, body);
    Json(json!({ "result": "OK" }))
}

async fn kv_del(State(kv): State<FakeKv>, Path(key): Path<String>) -> Json<Value> {
    let removed = kv.entries.lock().unwrap().remove(&key).is_some();
    Json(json!({ "result": if removed { 1 } else { 0 } }))
}

async fn kv_expire(
    State(kv): State<FakeKv>,
    Path((key, ttl)): Path<(String, u64)>,
) -> Json<Value> {
    let known = kv.entries.lock().unwrap().contains_key(&key);
    kv.expires.lock().unwrap().push((key, ttl));
    Json(json!({ "result": if known { 1 } else { 0 } }))
}
