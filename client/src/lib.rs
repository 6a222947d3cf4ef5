//! # Client data layer for the homepage dashboard
//!
//! The widgets' single read/write surface: [`DataManager`] holds the working
//! document in memory, mirrors every write to a [`store::LocalCache`], and
//! synchronizes with the remote `/data` endpoint while the shared-code
//! session is live. See [`manager`] for the consistency rules, [`session`]
//! for the session lifecycle, and [`remote`] for the HTTP mapping.

pub mod error;
pub mod manager;
pub mod remote;
pub mod session;

pub use error::DataError;
pub use manager::{DataManager, InitOutcome};
pub use remote::{Remote, DATA_KEY};
pub use session::{SessionGate, SessionState};
