//! # Filesystem-backed document cache
//!
//! [`FileCache`] persists the dashboard document as one pretty-printed JSON
//! file (`homepage-data.json`) under a caller-supplied directory, so state
//! survives restarts without a session. Pass a platform data directory (e.g.
//! from `dirs::data_dir()`) when embedding in a desktop shell.

use std::path::PathBuf;

use crate::cache::LocalCache;
use crate::document::AppData;

/// The fixed on-disk document name.
pub const CACHE_FILE_NAME: &str = "homepage-data.json";

/// Filesystem-backed [`LocalCache`].
#[derive(Clone, Debug)]
pub struct FileCache {
    base: PathBuf,
}

impl FileCache {
    pub fn new(base: PathBuf) -> Self {
        Self { base }
    }

    fn file_path(&self) -> PathBuf {
        self.base.join(CACHE_FILE_NAME)
    }

    /// Remove the cached document, if any.
    pub fn clear(&self) {
        let _ = std::fs::remove_file(self.file_path());
    }
}

impl LocalCache for FileCache {
    fn load(&self) -> Option<AppData> {
        let raw = std::fs::read_to_string(self.file_path()).ok()?;
        AppData::from_json(&raw).ok()
    }

    fn save(&self, data: &AppData) {
        let path = self.file_path();
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = std::fs::write(path, data.to_json_pretty());
    }
}
