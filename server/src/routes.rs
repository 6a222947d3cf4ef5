//! # The `/data` surface
//!
//! One resource, three verbs, session-gated except for the verification
//! actions:
//!
//! | Request | Behavior |
//! |---------|----------|
//! | `GET /data?key=<k>` | Validate + slide the session, return `{result: string\|null}`. |
//! | `POST /data {action:"request_code"}` | Echo the fixed verification code. |
//! | `POST /data {action:"verify_code", code}` | On match, mint a session and set the cookie. |
//! | `POST /data {key, value}` | Validate + slide the session, store `value` as JSON text. |
//! | `DELETE /data?key=<k>` | Validate + slide the session, delete the key. |
//!
//! Every session-gated handler touches the session marker first, so any
//! authorized access — reads included — extends the session to its full TTL.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::kv::{KvClient, KvError};
use crate::session;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub kv: KvClient,
    /// The fixed shared verification code.
    pub code: String,
    /// Session TTL in seconds, applied on mint and on every touch.
    pub session_ttl: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing key")]
    MissingKey,
    #[error("Missing value")]
    MissingValue,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Session expired")]
    SessionExpired,
    #[error("Invalid verification code")]
    InvalidCode,
    #[error(transparent)]
    Kv(#[from] KvError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::MissingKey | ApiError::MissingValue => {
                (StatusCode::BAD_REQUEST, json!({ "error": self.to_string() }))
            }
            ApiError::Unauthorized | ApiError::SessionExpired => {
                (StatusCode::UNAUTHORIZED, json!({ "error": self.to_string() }))
            }
            ApiError::InvalidCode => (
                StatusCode::UNAUTHORIZED,
                json!({ "success": false, "error": self.to_string() }),
            ),
            ApiError::Kv(e) => {
                tracing::error!("key-value store error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Remote store unavailable" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/data", get(get_data).post(post_data).delete(delete_data))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct DataQuery {
    key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostBody {
    action: Option<String>,
    code: Option<String>,
    key: Option<String>,
    value: Option<Value>,
}

/// Validate the session cookie and slide its expiration. 401 on a missing
/// cookie or a marker the store no longer holds.
async fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let cookie_header = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok());
    let token =
        session::token_from_cookie_header(cookie_header).ok_or(ApiError::Unauthorized)?;
    if !session::touch(&state.kv, &token, state.session_ttl).await? {
        return Err(ApiError::SessionExpired);
    }
    Ok(())
}

async fn get_data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let key = query.key.ok_or(ApiError::MissingKey)?;
    require_session(&state, &headers).await?;
    let result = state.kv.get(&key).await?;
    Ok(Json(json!({ "result": result })))
}

async fn post_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<PostBody>,
) -> Result<Response, ApiError> {
    match body.action.as_deref() {
        Some("request_code") => {
            // Deliberately non-secret: a single-user convenience gate.
            Ok(Json(json!({ "code": state.code })).into_response())
        }
        Some("verify_code") => {
            let submitted = body.code.unwrap_or_default();
            if !session::code_matches(&submitted, &state.code) {
                return Err(ApiError::InvalidCode);
            }
            let token = session::mint_token();
            session::create(&state.kv, &token, state.session_ttl).await?;
            tracing::info!("verification succeeded, session minted");
            let cookie = session::build_cookie(&token, state.session_ttl);
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "success": true })),
            )
                .into_response())
        }
        _ => {
            require_session(&state, &headers).await?;
            let key = body.key.ok_or(ApiError::MissingKey)?;
            let value = body.value.ok_or(ApiError::MissingValue)?;
            state.kv.set(&key, &value.to_string()).await?;
            Ok(Json(json!({ "success": true })).into_response())
        }
    }
}

async fn delete_data(
    State(state): State<AppState>,
    Query(query): Query<DataQuery>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let key = query.key.ok_or(ApiError::MissingKey)?;
    require_session(&state, &headers).await?;
    let removed = state.kv.del(&key).await?;
    Ok(Json(json!({ "result": removed })))
}
