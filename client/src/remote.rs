//! # HTTP client for the `/data` surface
//!
//! Thin wrapper over reqwest with a cookie store, so the session cookie set
//! by `verify_code` rides along on every later call automatically. Responses
//! map onto the [`DataError`] taxonomy: 401 is [`DataError::Unauthorized`]
//! (or [`DataError::InvalidCode`] during verification), transport trouble and
//! unexpected statuses are [`DataError::RemoteUnavailable`] — so callers can
//! always tell "no session" apart from "store unreachable".

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

use store::AppData;

use crate::error::DataError;

/// Store key holding the full application document.
pub const DATA_KEY: &str = "homepage_data";

#[derive(Debug, Deserialize)]
struct ResultEnvelope {
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CodeEnvelope {
    code: String,
}

/// Client for the application-facing data endpoint.
#[derive(Clone, Debug)]
pub struct Remote {
    http: reqwest::Client,
    base: String,
}

impl Remote {
    pub fn new(base_url: &str) -> Result<Self, DataError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        Ok(Self {
            http,
            base: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn data_url(&self) -> String {
        format!("{}/data", self.base)
    }

    /// Fetch the remote document. `Ok(None)` when the store holds nothing
    /// under the data key, or when the stored text no longer parses.
    pub async fn fetch_document(&self) -> Result<Option<AppData>, DataError> {
        let response = self
            .http
            .get(self.data_url())
            .query(&[("key", DATA_KEY)])
            .send()
            .await
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        let envelope: ResultEnvelope = Self::parse(response, false).await?;
        match envelope.result {
            None => Ok(None),
            Some(raw) => match AppData::from_json(&raw) {
                Ok(doc) => Ok(Some(doc)),
                Err(e) => {
                    tracing::warn!("remote document is unreadable, ignoring it: {e}");
                    Ok(None)
                }
            },
        }
    }

    /// Write the full document under the data key.
    pub async fn store_document(&self, doc: &AppData) -> Result<(), DataError> {
        let response = self
            .http
            .post(self.data_url())
            .json(&json!({ "key": DATA_KEY, "value": doc }))
            .send()
            .await
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        Self::parse::<serde_json::Value>(response, false).await?;
        Ok(())
    }

    /// Delete a remote key.
    pub async fn delete_key(&self, key: &str) -> Result<(), DataError> {
        let response = self
            .http
            .delete(self.data_url())
            .query(&[("key", key)])
            .send()
            .await
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        Self::parse::<serde_json::Value>(response, false).await?;
        Ok(())
    }

    /// Ask the server for the verification code.
    pub async fn request_code(&self) -> Result<String, DataError> {
        let response = self
            .http
            .post(self.data_url())
            .json(&json!({ "action": "request_code" }))
            .send()
            .await
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        let envelope: CodeEnvelope = Self::parse(response, false).await?;
        Ok(envelope.code)
    }

    /// Submit a verification code. On success the session cookie lands in
    /// this client's cookie store.
    pub async fn verify_code(&self, code: &str) -> Result<(), DataError> {
        let response = self
            .http
            .post(self.data_url())
            .json(&json!({ "action": "verify_code", "code": code }))
            .send()
            .await
            .map_err(|e| DataError::RemoteUnavailable(e.to_string()))?;
        Self::parse::<serde_json::Value>(response, true).await?;
        Ok(())
    }

    async fn parse<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        verifying: bool,
    ) -> Result<T, DataError> {
        match response.status() {
            StatusCode::UNAUTHORIZED if verifying => Err(DataError::InvalidCode),
            StatusCode::UNAUTHORIZED => Err(DataError::Unauthorized),
            status if status.is_success() => response
                .json()
                .await
                .map_err(|e| DataError::RemoteUnavailable(e.to_string())),
            status => Err(DataError::RemoteUnavailable(format!(
                "unexpected status {status}"
            ))),
        }
    }
}
