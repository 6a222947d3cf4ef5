//! # DataManager — the session-gated read/write surface
//!
//! Composes the local cache, the remote `/data` client, and the session gate
//! into the one object the widgets talk to. The rules, in order of authority:
//!
//! - The in-memory working document is what accessors read. Reads never touch
//!   the network.
//! - Every write lands in memory and the local cache unconditionally; it is
//!   pushed to the remote store only while the session is live, best-effort,
//!   and a failed push never rolls anything back.
//! - Remote pushes serialize through an async mutex and the body is taken
//!   from the working document *at send time*, so a slow earlier push can
//!   never clobber newer state with a stale snapshot.
//! - [`initialize`](DataManager::initialize) runs once: cache in, remote
//!   probe, and on divergence the remote copy wins wholesale (the caller is
//!   told to re-render instead of attempting a field-level merge).
//!
//! Last writer wins is the only consistency model on offer.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use store::{AppData, Card, LocalCache, Todo, WeatherConfig, WidgetKind};

use crate::error::DataError;
use crate::remote::Remote;
use crate::session::{SessionGate, SessionState};

/// What `initialize` decided, so the caller knows whether to re-render.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitOutcome {
    /// No valid session; operating out of the local cache only.
    CacheOnly,
    /// Session live; the remote document matched the working copy (or the
    /// remote held nothing yet).
    RemoteInSync,
    /// Session live and the remote differed: the working copy and cache were
    /// replaced wholesale. Re-render everything from the document.
    RemoteApplied,
}

struct Inner {
    doc: Mutex<AppData>,
    cache: Box<dyn LocalCache + Send + Sync>,
    remote: Remote,
    gate: Mutex<SessionGate>,
    /// Serializes remote pushes; the document is re-read under this lock.
    push_lock: tokio::sync::Mutex<()>,
    initialized: AtomicBool,
}

/// Cheap-clone handle over the shared data layer state. Construct one per
/// application instance and pass it to every widget controller.
#[derive(Clone)]
pub struct DataManager {
    inner: Arc<Inner>,
}

impl DataManager {
    pub fn new(
        remote_base: &str,
        cache: impl LocalCache + Send + Sync + 'static,
    ) -> Result<Self, DataError> {
        Ok(Self {
            inner: Arc::new(Inner {
                doc: Mutex::new(AppData::default()),
                cache: Box::new(cache),
                remote: Remote::new(remote_base)?,
                gate: Mutex::new(SessionGate::new()),
                push_lock: tokio::sync::Mutex::new(()),
                initialized: AtomicBool::new(false),
            }),
        })
    }

    /// Load the cache, probe the session, and reconcile with the remote
    /// store. Idempotent: only the first call does any work.
    pub async fn initialize(&self) -> InitOutcome {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            return if self.is_authenticated() {
                InitOutcome::RemoteInSync
            } else {
                InitOutcome::CacheOnly
            };
        }

        if let Some(cached) = self.inner.cache.load() {
            *self.inner.doc.lock().unwrap() = cached;
        }

        match self.inner.remote.fetch_document().await {
            Ok(remote_doc) => {
                self.inner.gate.lock().unwrap().verified();
                match remote_doc {
                    Some(remote) if remote != *self.inner.doc.lock().unwrap() => {
                        // Remote wins: replace wholesale and signal a re-render.
                        *self.inner.doc.lock().unwrap() = remote.clone();
                        self.inner.cache.save(&remote);
                        InitOutcome::RemoteApplied
                    }
                    _ => InitOutcome::RemoteInSync,
                }
            }
            Err(DataError::Unauthorized) => InitOutcome::CacheOnly,
            Err(e) => {
                tracing::warn!("remote probe failed, staying on the local cache: {e}");
                InitOutcome::CacheOnly
            }
        }
    }

    pub fn session_state(&self) -> SessionState {
        self.inner.gate.lock().unwrap().state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.gate.lock().unwrap().is_authenticated()
    }

    /// Ask the server for the verification code.
    pub async fn request_code(&self) -> Result<String, DataError> {
        let code = self.inner.remote.request_code().await?;
        self.inner.gate.lock().unwrap().code_requested();
        Ok(code)
    }

    /// Submit a verification code. On success the gate opens and later writes
    /// push through to the remote store.
    pub async fn verify_code(&self, code: &str) -> Result<(), DataError> {
        self.inner.remote.verify_code(code).await?;
        self.inner.gate.lock().unwrap().verified();
        Ok(())
    }

    // Read path: clones of the working document, never network-bound.

    pub fn document(&self) -> AppData {
        self.inner.doc.lock().unwrap().clone()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.inner.doc.lock().unwrap().cards.clone()
    }

    pub fn todos(&self) -> Vec<Todo> {
        self.inner.doc.lock().unwrap().todos.clone()
    }

    pub fn notepad(&self) -> String {
        self.inner.doc.lock().unwrap().notepad.clone()
    }

    pub fn widget_order(&self) -> Vec<WidgetKind> {
        self.inner.doc.lock().unwrap().widget_order.clone()
    }

    pub fn weather_config(&self) -> WeatherConfig {
        self.inner.doc.lock().unwrap().weather_config.clone()
    }

    pub fn widget_visibility(&self) -> BTreeMap<WidgetKind, bool> {
        self.inner.doc.lock().unwrap().widget_visibility.clone()
    }

    // Write path: memory first, cache always, remote only while live.

    pub async fn set_cards(&self, cards: Vec<Card>) {
        self.mutate(|doc| doc.cards = cards).await;
    }

    pub async fn set_todos(&self, todos: Vec<Todo>) {
        self.mutate(|doc| doc.todos = todos).await;
    }

    pub async fn set_notepad(&self, content: String) {
        self.mutate(|doc| doc.notepad = content).await;
    }

    pub async fn set_widget_order(&self, order: Vec<WidgetKind>) {
        self.mutate(|doc| doc.widget_order = order).await;
    }

    /// Field-wise merge onto the current config; empty fields keep their
    /// existing values.
    pub async fn set_weather_config(&self, config: WeatherConfig) {
        self.mutate(|doc| doc.weather_config = doc.weather_config.merged_with(&config))
            .await;
    }

    pub async fn set_widget_visibility(&self, kind: WidgetKind, visible: bool) {
        self.mutate(|doc| {
            doc.widget_visibility.insert(kind, visible);
        })
        .await;
    }

    pub async fn update_widget_visibility(&self, visibility: BTreeMap<WidgetKind, bool>) {
        self.mutate(|doc| doc.widget_visibility = visibility).await;
    }

    /// Reset everything to defaults (the explicit "clear all data" action).
    pub async fn clear_all(&self) {
        self.mutate(|doc| *doc = AppData::default()).await;
    }

    /// Serialize the working document for the caller to persist externally.
    /// Pure: no side effects.
    pub fn export_all(&self) -> String {
        self.inner.doc.lock().unwrap().to_json_pretty()
    }

    /// Replace the working document wholesale with a parsed import. A parse
    /// failure applies nothing.
    pub async fn import_all(&self, raw: &str) -> Result<(), DataError> {
        let imported = AppData::from_json(raw)?;
        self.mutate(|doc| *doc = imported).await;
        Ok(())
    }

    async fn mutate(&self, apply: impl FnOnce(&mut AppData)) {
        let snapshot = {
            let mut doc = self.inner.doc.lock().unwrap();
            apply(&mut doc);
            doc.clone()
        };
        self.inner.cache.save(&snapshot);
        if self.is_authenticated() {
            self.push().await;
        }
    }

    /// Best-effort full-document push. Failures are logged and swallowed;
    /// a 401 flips the gate to expired so later writes stop trying.
    async fn push(&self) {
        let _guard = self.inner.push_lock.lock().await;
        let snapshot = self.inner.doc.lock().unwrap().clone();
        match self.inner.remote.store_document(&snapshot).await {
            Ok(()) => {}
            Err(DataError::Unauthorized) => {
                tracing::warn!("session expired during remote write, keeping local state");
                self.inner.gate.lock().unwrap().expired();
            }
            Err(e) => {
                tracing::warn!("remote write failed, keeping local state: {e}");
            }
        }
    }
}
