use crate::config::{Config, ConfigError, ConfigResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Layered configuration loader
///
/// Precedence, lowest first: built-in defaults, the optional JSON file,
/// the process environment (after `.env` has been read into it).
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    file: Option<PathBuf>,
    dotenv: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            file: None,
            dotenv: true,
        }
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON config file before applying the environment
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Skip reading `.env`
    pub fn without_dotenv(mut self) -> Self {
        self.dotenv = false;
        self
    }

    /// Load from the real process environment
    pub async fn load(&self) -> ConfigResult<Config> {
        if self.dotenv {
            match dotenv::dotenv() {
                Ok(path) => debug!("Loaded environment from {:?}", path),
                Err(e) => debug!("No .env loaded: {}", e),
            }
        }
        self.load_with(|key| std::env::var(key).ok()).await
    }

    /// Load with an explicit environment lookup
    pub async fn load_with<F>(&self, lookup: F) -> ConfigResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match &self.file {
            Some(path) => Self::read_file(path, &lookup).await?,
            None => Config::default(),
        };

        config.apply_env(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    async fn read_file<F>(path: &Path, lookup: &F) -> ConfigResult<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        info!("Loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let content = expand_env_vars(&content, lookup)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Expand `${VAR}` or `${VAR:-default}` references
pub fn expand_env_vars<F>(content: &str, lookup: F) -> ConfigResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let re = Regex::new(r"\$\{([^}]+)\}")
        .map_err(|e| ConfigError::Validation(format!("Invalid pattern: {}", e)))?;
    let mut result = content.to_string();

    for cap in re.captures_iter(content) {
        let (Some(full_match), Some(var_expr)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let var_expr = var_expr.as_str();

        let (var_name, default_value) = match var_expr.split_once(":-") {
            Some((name, default)) => (name, Some(default)),
            None => (var_expr, None),
        };

        let replacement = match (lookup(var_name), default_value) {
            (Some(val), _) => val,
            (None, Some(default)) => default.to_string(),
            (None, None) => return Err(ConfigError::EnvVarNotFound(var_name.to_string())),
        };

        result = result.replace(full_match.as_str(), &replacement);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_BASE_URL;
    use crate::env;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_env_var_expansion() {
        let lookup = |key: &str| (key == "HOST").then(|| "10.0.0.1".to_string());

        let expanded = expand_env_vars(
            r#"{"a": "http://${HOST}/v1", "b": "${PORT:-9443}"}"#,
            lookup,
        )
        .unwrap();
        assert_eq!(expanded, r#"{"a": "http://10.0.0.1/v1", "b": "9443"}"#);

        let err = expand_env_vars("${MISSING}", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVarNotFound(ref v) if v == "MISSING"));
    }

    #[tokio::test]
    async fn test_load_defaults_without_file() {
        let config = ConfigLoader::new()
            .without_dotenv()
            .load_with(no_env)
            .await
            .unwrap();
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
    }

    #[tokio::test]
    async fn test_file_then_env_precedence() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "api": {{"base_url": "https://${{API_HOST:-file.local}}/api/v1", "model": "GigaChat-Pro"}},
                "tls": {{"cert_path": "/etc/ssl/gigachat.pem"}}
            }}"#
        )
        .unwrap();

        let loader = ConfigLoader::new().with_file(file.path()).without_dotenv();

        let from_file = loader.load_with(no_env).await.unwrap();
        assert_eq!(from_file.api.base_url, "https://file.local/api/v1");
        assert_eq!(from_file.api.model, "GigaChat-Pro");
        assert_eq!(
            from_file.tls.cert_path,
            Some(PathBuf::from("/etc/ssl/gigachat.pem"))
        );
        assert_eq!(from_file.auth.scope, "GIGACHAT_API_PERS");

        let overridden = loader
            .load_with(|key| (key == env::MODEL).then(|| "GigaChat-Max".to_string()))
            .await
            .unwrap();
        assert_eq!(overridden.api.model, "GigaChat-Max");
    }

    #[tokio::test]
    async fn test_partial_sections_keep_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"auth": {{"basic_auth_token": "c2VjcmV0"}}, "api": {{"model": "GigaChat-Max"}}}}"#
        )
        .unwrap();

        let config = ConfigLoader::new()
            .with_file(file.path())
            .without_dotenv()
            .load_with(no_env)
            .await
            .unwrap();

        assert_eq!(config.auth.basic_auth_token().unwrap(), "c2VjcmV0");
        assert_eq!(config.auth.oauth_url, crate::config::DEFAULT_OAUTH_URL);
        assert_eq!(config.auth.scope, "GIGACHAT_API_PERS");
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.api.model, "GigaChat-Max");
    }

    #[tokio::test]
    async fn test_invalid_file_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"api": {{"base_url": "not-a-url", "model": "GigaChat"}}}}"#).unwrap();

        let err = ConfigLoader::new()
            .with_file(file.path())
            .without_dotenv()
            .load_with(no_env)
            .await
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
