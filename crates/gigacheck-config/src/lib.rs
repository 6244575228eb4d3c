//! # gigacheck-config
//!
//! Layered settings for the harness: built-in defaults, an optional JSON
//! file with `${VAR}` / `${VAR:-default}` expansion, then the process
//! environment (after `.env`). Secrets are wrapped in [`Secret`] so they stay
//! out of `Debug` and serialized output.

pub mod config;
pub mod loader;

pub use config::{
    ApiSettings, AuthSettings, Config, ConfigError, ConfigResult, Secret, TlsSettings,
};
pub use loader::{expand_env_vars, ConfigLoader};

use std::path::PathBuf;

/// Environment variable names read by the harness
pub mod env {
    pub const BASIC_AUTH_TOKEN: &str = "GIGACHAT_BASIC_AUTH_TOKEN";
    pub const API_BASE_URL: &str = "GIGACHAT_API_BASE_URL";
    pub const OAUTH_URL: &str = "GIGACHAT_OAUTH_URL";
    pub const SCOPE: &str = "GIGACHAT_SCOPE";
    pub const CERT_PATH: &str = "GIGACHAT_CERT_PATH";
    pub const INSECURE_TLS: &str = "GIGACHAT_INSECURE_TLS";
    pub const MODEL: &str = "GIGACHAT_MODEL";
}

/// Expand a leading `~` to the user's home directory
pub fn expand_tilde(path: &str) -> Option<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        dirs::home_dir().map(|home| home.join(rest))
    } else {
        Some(PathBuf::from(path))
    }
}
