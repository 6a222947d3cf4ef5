//! # Session minting, validation, and sliding expiration
//!
//! A session is nothing more than an opaque token whose marker key exists in
//! the remote key-value store. The marker (`homepage_session_<token>` → `"1"`)
//! carries the authoritative lifetime via the store's TTL; the client holds
//! the token in an HttpOnly cookie. Validating a session is an existence
//! check, and every successful check rewrites the marker and resets its TTL
//! to the full configured window — reads extend the session exactly like
//! writes do.
//!
//! The verification code is a fixed shared secret compared in constant time.
//! There is no refresh token: an expired marker requires a fresh code
//! verification.

use cookie::time::Duration;
use cookie::{Cookie, SameSite};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::kv::{KvClient, KvError};

/// Cookie carrying the session token.
pub const SESSION_COOKIE: &str = "homepage_session";

/// Marker value stored under the session key (JSON-encoded, as the store
/// holds raw JSON text).
const SESSION_MARKER: &str = "\"1\"";

const TOKEN_LEN: usize = 32;

/// Store key holding the marker for `token`.
pub fn session_key(token: &str) -> String {
    format!("homepage_session_{token}")
}

/// Mint a fresh opaque session token.
pub fn mint_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// Compare a submitted code against the fixed secret without leaking the
/// position of the first mismatch. Timing depends only on the secret's
/// length.
pub fn code_matches(submitted: &str, secret: &str) -> bool {
    let a = submitted.as_bytes();
    let b = secret.as_bytes();
    let mut diff = a.len() ^ b.len();
    for (i, &expected) in b.iter().enumerate() {
        let got = a.get(i).copied().unwrap_or(0);
        diff |= (got ^ expected) as usize;
    }
    diff == 0
}

/// Register a new session marker with the full TTL.
pub async fn create(kv: &KvClient, token: &str, ttl_secs: u64) -> Result<(), KvError> {
    let key = session_key(token);
    kv.set(&key, SESSION_MARKER).await?;
    kv.expire(&key, ttl_secs).await
}

/// Validate `token` and, when live, slide its expiration out to the full TTL.
/// Returns `false` when the marker is gone (expired or never existed).
pub async fn touch(kv: &KvClient, token: &str, ttl_secs: u64) -> Result<bool, KvError> {
    let key = session_key(token);
    if kv.get(&key).await?.is_none() {
        return Ok(false);
    }
    kv.set(&key, SESSION_MARKER).await?;
    kv.expire(&key, ttl_secs).await?;
    Ok(true)
}

/// `Set-Cookie` value for a freshly minted session.
pub fn build_cookie(token: &str, ttl_secs: u64) -> String {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::seconds(ttl_secs as i64))
        .build()
        .to_string()
}

/// Extract the session token from a `Cookie` request header, if present.
pub fn token_from_cookie_header(header: Option<&str>) -> Option<String> {
    let header = header?;
    Cookie::split_parse(header.to_string())
        .filter_map(Result::ok)
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.value().to_string())
}
