use serde::{Deserialize, Serialize, Serializer};
use std::path::PathBuf;

use crate::env;

pub const DEFAULT_API_BASE_URL: &str = "https://gigachat.devices.sberbank.ru/api/v1";
pub const DEFAULT_OAUTH_URL: &str = "https://ngw.devices.sberbank.ru:9443/api/v2/oauth";
pub const DEFAULT_SCOPE: &str = "GIGACHAT_API_PERS";
pub const DEFAULT_MODEL: &str = "GigaChat";

/// Harness configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub tls: TlsSettings,
}

impl Config {
    /// Defaults overridden by the process environment
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override fields from an environment lookup
    ///
    /// Blank values count as unset so that an empty `.env` entry does not
    /// wipe a default.
    pub fn apply_env<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(token) = get(env::BASIC_AUTH_TOKEN) {
            self.auth.basic_auth_token = Some(Secret::new(token));
        }
        if let Some(url) = get(env::OAUTH_URL) {
            self.auth.oauth_url = url;
        }
        if let Some(scope) = get(env::SCOPE) {
            self.auth.scope = scope;
        }
        if let Some(url) = get(env::API_BASE_URL) {
            self.api.base_url = url;
        }
        if let Some(model) = get(env::MODEL) {
            self.api.model = model;
        }
        if let Some(path) = get(env::CERT_PATH) {
            self.tls.cert_path = crate::expand_tilde(&path);
        }
        if let Some(flag) = get(env::INSECURE_TLS) {
            self.tls.accept_invalid_certs = parse_bool(env::INSECURE_TLS, &flag)?;
        }
        Ok(())
    }

    /// Check URLs and required values that have a fixed shape
    pub fn validate(&self) -> ConfigResult<()> {
        validate_url("api.base_url", &self.api.base_url)?;
        validate_url("auth.oauth_url", &self.auth.oauth_url)?;

        if self.auth.scope.trim().is_empty() {
            return Err(ConfigError::Validation("auth.scope cannot be empty".to_string()));
        }
        if self.api.model.trim().is_empty() {
            return Err(ConfigError::Validation("api.model cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// OAuth settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AuthSettings {
    /// Base64 `client_id:client_secret`, sent as `Authorization: Basic ...`
    pub basic_auth_token: Option<Secret>,
    pub oauth_url: String,
    pub scope: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            basic_auth_token: None,
            oauth_url: DEFAULT_OAUTH_URL.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl AuthSettings {
    /// The basic-auth secret, or a configuration error naming the variable
    pub fn basic_auth_token(&self) -> ConfigResult<&str> {
        self.basic_auth_token
            .as_ref()
            .map(Secret::expose)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingSecret(env::BASIC_AUTH_TOKEN.to_string()))
    }
}

/// Target API settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    /// Model used by every single-model scenario
    pub model: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// Transport trust settings
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TlsSettings {
    /// PEM root certificate added to the trust store when the file exists
    #[serde(default)]
    pub cert_path: Option<PathBuf>,
    /// Opt-in: disable certificate verification
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

/// String that never shows up in logs or serialized output
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("***")
    }
}

fn parse_bool(key: &str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Validation(format!(
            "Invalid boolean for {}: {}",
            key, value
        ))),
    }
}

fn validate_url(key: &str, value: &str) -> ConfigResult<()> {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(ConfigError::Validation(format!(
            "{} must be an http(s) URL, got '{}'",
            key, value
        ))),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} is not set; put it in the environment or a .env file")]
    MissingSecret(String),

    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.auth.oauth_url, DEFAULT_OAUTH_URL);
        assert_eq!(config.auth.scope, "GIGACHAT_API_PERS");
        assert_eq!(config.api.model, "GigaChat");
        assert!(config.auth.basic_auth_token.is_none());
        assert!(!config.tls.accept_invalid_certs);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                (env::BASIC_AUTH_TOKEN, "c2VjcmV0"),
                (env::API_BASE_URL, "http://127.0.0.1:9000/api/v1"),
                (env::OAUTH_URL, "http://127.0.0.1:9000/oauth"),
                (env::CERT_PATH, "/tmp/ca.pem"),
                (env::INSECURE_TLS, "yes"),
                (env::MODEL, "GigaChat-Pro"),
            ]))
            .unwrap();

        assert_eq!(config.auth.basic_auth_token().unwrap(), "c2VjcmV0");
        assert_eq!(config.api.base_url, "http://127.0.0.1:9000/api/v1");
        assert_eq!(config.auth.oauth_url, "http://127.0.0.1:9000/oauth");
        assert_eq!(config.tls.cert_path, Some(PathBuf::from("/tmp/ca.pem")));
        assert!(config.tls.accept_invalid_certs);
        assert_eq!(config.api.model, "GigaChat-Pro");
    }

    #[test]
    fn test_blank_env_values_are_ignored() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[(env::API_BASE_URL, "  "), (env::BASIC_AUTH_TOKEN, "")]))
            .unwrap();

        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert!(config.auth.basic_auth_token.is_none());
    }

    #[test]
    fn test_missing_secret() {
        let mut config = Config::default();
        config.auth.basic_auth_token = Some(Secret::new("   "));
        let err = config.auth.basic_auth_token().unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret(ref name) if name == env::BASIC_AUTH_TOKEN));
    }

    #[test]
    fn test_invalid_bool() {
        let mut config = Config::default();
        let err = config
            .apply_env(lookup(&[(env::INSECURE_TLS, "maybe")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = Config::default();
        config.api.base_url = "gigachat.local".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_secret_is_redacted() {
        let mut config = Config::default();
        config.auth.basic_auth_token = Some(Secret::new("top-secret"));

        let debug = format!("{:?}", config);
        let json = serde_json::to_string(&config).unwrap();

        assert!(!debug.contains("top-secret"));
        assert!(!json.contains("top-secret"));
        assert!(json.contains("***"));
    }
}
