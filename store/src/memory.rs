use std::sync::{Arc, Mutex};

use crate::cache::LocalCache;
use crate::document::AppData;

/// In-memory cache for tests and cache-less embeddings. Clones share storage,
/// so a "reload" against the same cache is a fresh handle over the same data.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    inner: Arc<Mutex<Option<AppData>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn load(&self) -> Option<AppData> {
        self.inner.lock().ok()?.clone()
    }

    fn save(&self, data: &AppData) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(data.clone());
        }
    }
}
