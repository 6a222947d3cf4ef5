//! # Homepage data server
//!
//! Fronts the hosted key-value store for the dashboard frontend: one `/data`
//! resource gated by a cookie-held session whose lifetime lives store-side as
//! a TTL'd marker key. See [`routes`] for the HTTP surface, [`session`] for
//! token minting and sliding expiration, and [`kv`] for the store client.

pub mod kv;
pub mod routes;
pub mod session;
pub mod settings;

#[cfg(test)]
pub mod testkv;

#[cfg(test)]
mod e2e;

pub use routes::{router, AppState};
pub use settings::Settings;
