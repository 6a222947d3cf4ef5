use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Kv {
    pub url: String,
    pub token: String,
}

impl Default for Kv {
    fn default() -> Self {
        Self {
            url: "http://localhost:8079".into(),
            token: "dev-token".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    /// The fixed shared verification code. A single-tenant convenience gate,
    /// not a credential.
    pub code: String,
    /// Session time-to-live in seconds. Reset to this value on every
    /// authorized access (sliding expiration).
    pub ttl: u64,
}

impl Default for Auth {
    fn default() -> Self {
        Self {
            code: "2550931665".into(),
            ttl: 60 * 60 * 24 * 15,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Listen {
    pub host: String,
    pub port: u16,
}

impl Default for Listen {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    pub kv: Kv,
    pub auth: Auth,
    pub listen: Listen,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("kv.url", "http://localhost:8079")?
            .set_default("kv.token", "dev-token")?
            .set_default("auth.code", "2550931665")?
            .set_default("auth.ttl", 60i64 * 60 * 24 * 15)?
            .set_default("listen.host", "127.0.0.1")?
            .set_default("listen.port", 8080)?
            .add_source(
                File::with_name("config.toml")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::default().separator("_"))
            .build()?;

        config.try_deserialize()
    }
}
