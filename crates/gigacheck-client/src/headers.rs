//! Per-call API headers

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use uuid::Uuid;

use crate::error::ClientError;

/// Correlation identifier header, fresh for every request
pub const REQUEST_ID_HEADER: &str = "x-request-id";
/// Session identifier header, fresh for every request
pub const SESSION_ID_HEADER: &str = "x-session-id";

const JSON: &str = "application/json";

/// Headers for one API call
#[derive(Clone)]
pub struct RequestHeaders {
    token: String,
    request_id: Uuid,
    session_id: Uuid,
}

impl RequestHeaders {
    /// Build headers for `token` with new correlation and session ids
    pub fn new(token: &str) -> Result<Self, ClientError> {
        if token.trim().is_empty() {
            return Err(ClientError::InvalidHeader("bearer token is empty".to_string()));
        }
        Ok(Self {
            token: token.to_string(),
            request_id: Uuid::new_v4(),
            session_id: Uuid::new_v4(),
        })
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Convert into a reqwest header map
    pub fn to_header_map(&self) -> Result<HeaderMap, ClientError> {
        let mut headers = HeaderMap::new();

        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.token))
                .map_err(|e| ClientError::InvalidHeader(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON));
        headers.insert(ACCEPT, HeaderValue::from_static(JSON));
        headers.insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            uuid_value(self.request_id)?,
        );
        headers.insert(
            HeaderName::from_static(SESSION_ID_HEADER),
            uuid_value(self.session_id)?,
        );

        Ok(headers)
    }
}

impl std::fmt::Debug for RequestHeaders {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestHeaders")
            .field("authorization", &"Bearer ***")
            .field("request_id", &self.request_id)
            .field("session_id", &self.session_id)
            .finish()
    }
}

fn uuid_value(id: Uuid) -> Result<HeaderValue, ClientError> {
    HeaderValue::from_str(&id.to_string()).map_err(|e| ClientError::InvalidHeader(e.to_string()))
}
