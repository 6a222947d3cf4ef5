//! On-device mirror of the application document.
//!
//! The cache is the always-available fallback: every write goes through it,
//! and unauthenticated sessions run entirely out of it. Implementations must
//! never panic or surface errors — a corrupt or unwritable cache degrades to
//! "no cached value", not a crash in the caller.

use crate::document::AppData;

/// Synchronous document mirror keyed by a single fixed name.
pub trait LocalCache {
    /// Returns the cached document, or `None` when absent or unreadable.
    fn load(&self) -> Option<AppData>;

    /// Persists the document. Failures are swallowed.
    fn save(&self, data: &AppData);
}
