//! # Remote key-value store client
//!
//! [`KvClient`] wraps the hosted key-value store's REST surface
//! (`GET /get/<key>`, `POST /set/<key>`, `POST /del/<key>`,
//! `POST /expire/<key>/<ttl>`), authenticated with a static bearer token that
//! never leaves this process. Values travel as raw JSON text: `set` stores the
//! string it is given and `get` returns it verbatim, so the store never needs
//! to understand the document inside.
//!
//! A `get` on a missing key is `Ok(None)`, never an error — network and
//! status failures surface as [`KvError`] so callers can tell "absent" apart
//! from "unreachable". Every call is a single attempt; fallback is the
//! caller's decision.

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum KvError {
    #[error("key-value store request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("key-value store returned status {0}")]
    Status(StatusCode),
}

/// Response envelope used by every store endpoint.
#[derive(Debug, Deserialize)]
struct KvEnvelope {
    result: Option<Value>,
}

/// Client for the remote key-value store.
#[derive(Clone, Debug)]
pub struct KvClient {
    http: reqwest::Client,
    base: String,
    token: String,
}

impl KvClient {
    pub fn new(base: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: base.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    async fn call(&self, path: &str, body: Option<String>) -> Result<KvEnvelope, KvError> {
        let url = format!("{}{}", self.base, path);
        let request = match body {
            Some(body) => self.http.post(&url).body(body),
            None => self.http.get(&url),
        };
        let response = request.bearer_auth(&self.token).send().await?;
        if !response.status().is_success() {
            return Err(KvError::Status(response.status()));
        }
        Ok(response.json().await?)
    }

    /// Fetch the raw stored text for `key`. Missing key is `Ok(None)`.
    pub async fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        let envelope = self.call(&format!("/get/{key}"), None).await?;
        Ok(match envelope.result {
            Some(Value::String(s)) => Some(s),
            Some(Value::Null) | None => None,
            // The store only hands back strings for GET; anything else is
            // treated as the value's JSON text.
            Some(other) => Some(other.to_string()),
        })
    }

    /// Store raw text under `key`.
    pub async fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.call(&format!("/set/{key}"), Some(value.to_string()))
            .await?;
        Ok(())
    }

    /// Delete `key`, returning the number of removed entries.
    pub async fn del(&self, key: &str) -> Result<u64, KvError> {
        let envelope = self
            .call(&format!("/del/{key}"), Some(String::new()))
            .await?;
        Ok(envelope
            .result
            .and_then(|v| v.as_u64())
            .unwrap_or_default())
    }

    /// Reset the TTL of `key` to `ttl_secs` from now.
    pub async fn expire(&self, key: &str, ttl_secs: u64) -> Result<(), KvError> {
        self.call(&format!("/expire/{key}/{ttl_secs}"), Some(String::new()))
            .await?;
        Ok(())
    }
}
