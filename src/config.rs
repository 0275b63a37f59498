//! Configuration module for Council Core.
//!
//! Loads configuration from YAML files and environment variables.

use std::path::PathBuf;

use config::builder::DefaultState;
use config::{Config as ConfigLoader, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub profiles: ProfileConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Secrets used by the identity and admin gates.
///
/// Both default to empty, which leaves the matching path permanently closed.
#[derive(Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// HS256 secret shared with the identity provider.
    #[serde(default)]
    pub jwt_secret: String,
    /// Static key expected in the `X-Admin-Key` header.
    #[serde(default)]
    pub admin_api_key: String,
}

impl AuthConfig {
    pub fn jwt_configured(&self) -> bool {
        !self.jwt_secret.is_empty()
    }

    pub fn admin_configured(&self) -> bool {
        !self.admin_api_key.is_empty()
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("admin_api_key", &redact(&self.admin_api_key))
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Profile storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileConfig {
    /// Directory holding one JSON file per user.
    pub data_dir: PathBuf,
}

impl Config {
    /// Load configuration from files and environment.
    ///
    /// Priority (highest to lowest):
    /// 1. SUPABASE_JWT_SECRET / ADMIN_API_KEY
    /// 2. Environment variables (COUNCIL__*)
    /// 3. config/local.yaml (if exists)
    /// 4. config/default.yaml (if exists)
    /// 5. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let config = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix("COUNCIL")
                    .separator("__")
                    .try_parsing(true),
            )
            // Names used by the identity provider's own tooling
            .set_override_option("auth.jwt_secret", std::env::var("SUPABASE_JWT_SECRET").ok())?
            .set_override_option("auth.admin_api_key", std::env::var("ADMIN_API_KEY").ok())?
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8001_i64)?
            .set_default("profiles.data_dir", "data/profiles")
    }
}
