use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::Deserialize;
use uuid::Uuid;

use gigacheck_config::AuthSettings;

use crate::error::AuthError;

/// OAuth token response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    /// Expiry as reported by the endpoint (Unix milliseconds)
    pub expires_at: Option<i64>,
}

/// Bearer credential for one test session
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    expires_at: Option<i64>,
}

impl Credential {
    pub fn new(token: impl Into<String>, expires_at: Option<i64>) -> Self {
        Self {
            token: token.into(),
            expires_at,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn expires_at(&self) -> Option<i64> {
        self.expires_at
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Exchange the basic-auth secret for a bearer token
///
/// Sends `scope=<scope>` form-encoded with a fresh `RqUID`.
pub async fn acquire_token(
    client: &Client,
    settings: &AuthSettings,
) -> Result<Credential, AuthError> {
    let secret = settings.basic_auth_token()?;

    let rq_uid = Uuid::new_v4();
    let params = [("scope", settings.scope.as_str())];

    tracing::debug!(url = %settings.oauth_url, rq_uid = %rq_uid, scope = %settings.scope, "Requesting access token");

    let response = client
        .post(&settings.oauth_url)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(ACCEPT, "application/json")
        .header("RqUID", rq_uid.to_string())
        .header(AUTHORIZATION, format!("Basic {}", secret))
        .form(&params)
        .send()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| AuthError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(AuthError::Http {
            status: status.as_u16(),
            body,
        });
    }

    let token_response: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| AuthError::Protocol(format!("token response is not valid JSON: {}", e)))?;

    match token_response.access_token {
        Some(token) if !token.is_empty() => {
            tracing::info!(expires_at = ?token_response.expires_at, "Access token received");
            Ok(Credential::new(token, token_response.expires_at))
        }
        _ => Err(AuthError::Protocol(format!(
            "access_token not found in response: {}",
            body
        ))),
    }
}

/// Token provider bound to an HTTP client and auth settings
#[derive(Debug, Clone)]
pub struct TokenProvider {
    client: Client,
    settings: AuthSettings,
}

impl TokenProvider {
    pub fn new(client: Client, settings: AuthSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &AuthSettings {
        &self.settings
    }

    /// One network call per invocation; caching is the session's job
    pub async fn acquire(&self) -> Result<Credential, AuthError> {
        acquire_token(&self.client, &self.settings).await
    }
}
