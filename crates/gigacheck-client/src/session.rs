//! Session context: configuration, HTTP client and the cached credential

use std::time::Instant;

use reqwest::Client;
use tokio::sync::OnceCell;

use gigacheck_config::Config;
use gigacheck_core::{endpoint_url, ChatCompletionRequest, CHAT_COMPLETIONS_PATH};
use gigacheck_observability::create_request_span;
use tracing::Instrument;

use crate::api::ApiResponse;
use crate::auth::{Credential, TokenProvider};
use crate::error::{AuthError, ClientError};
use crate::headers::RequestHeaders;
use crate::tls::build_http_client;

/// Explicit per-run context passed to every scenario
///
/// The credential is acquired on first use and then shared read-only.
pub struct Session {
    config: Config,
    http: Client,
    provider: TokenProvider,
    credential: OnceCell<Credential>,
}

impl Session {
    /// Build the HTTP client from the TLS settings and create the session
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let http = build_http_client(&config.tls)?;
        Ok(Self::with_client(config, http))
    }

    /// Create a session around an existing client
    pub fn with_client(config: Config, http: Client) -> Self {
        let provider = TokenProvider::new(http.clone(), config.auth.clone());
        Self {
            config,
            http,
            provider,
            credential: OnceCell::new(),
        }
    }

    /// Create a session with a credential already in hand (skips OAuth)
    pub fn with_credential(config: Config, http: Client, credential: Credential) -> Self {
        let session = Self::with_client(config, http);
        let _ = session.credential.set(credential);
        session
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Acquire the credential once; later calls reuse it
    ///
    /// A failed acquisition is not cached, so a caller retrying would hit the
    /// OAuth endpoint again. The runner does not retry.
    pub async fn credential(&self) -> Result<&Credential, AuthError> {
        self.credential
            .get_or_try_init(|| self.provider.acquire())
            .await
    }

    /// Check if the credential has been acquired
    pub fn is_authenticated(&self) -> bool {
        self.credential.initialized()
    }

    /// Fresh headers for one call
    pub async fn api_headers(&self) -> Result<RequestHeaders, ClientError> {
        let credential = self.credential().await?;
        RequestHeaders::new(credential.token())
    }

    /// `{base_url}/chat/completions`
    pub fn chat_completions_url(&self) -> String {
        endpoint_url(&self.config.api.base_url, CHAT_COMPLETIONS_PATH)
    }

    /// POST a completion request and return whatever came back
    pub async fn post_chat_completions(
        &self,
        payload: &ChatCompletionRequest,
    ) -> Result<ApiResponse, ClientError> {
        let headers = self.api_headers().await?;
        let url = self.chat_completions_url();
        let span = create_request_span(&headers.request_id().to_string(), "POST", &url);

        async {
            let started = Instant::now();
            let response = self
                .http
                .post(&url)
                .headers(headers.to_header_map()?)
                .json(payload)
                .send()
                .await
                .map_err(|e| ClientError::Http(e.to_string()))?;

            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .map_err(|e| ClientError::Http(e.to_string()))?;
            let elapsed = started.elapsed();

            tracing::debug!(status, elapsed_ms = elapsed.as_millis() as u64, "Response received");

            Ok::<_, ClientError>(ApiResponse::new(status, body, headers.request_id(), elapsed))
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("base_url", &self.config.api.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}
