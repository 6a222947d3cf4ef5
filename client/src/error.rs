//! Error taxonomy for the data layer.
//!
//! Remote-I/O failures never reach callers of the accessor surface — they are
//! caught inside [`crate::DataManager`] and degrade to cache-only operation.
//! The variants here surface only from the explicit user actions (code
//! verification, import) and from the remote probe during initialization.

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// No session, or the session marker has expired store-side.
    #[error("not authenticated")]
    Unauthorized,

    /// The submitted verification code did not match.
    #[error("invalid verification code")]
    InvalidCode,

    /// The remote endpoint could not be reached or answered abnormally.
    #[error("remote store unavailable: {0}")]
    RemoteUnavailable(String),

    /// An import document failed to parse; nothing was applied.
    #[error("import document failed to parse: {0}")]
    MalformedImport(#[from] serde_json::Error),
}
