//! Raw API response as seen by a scenario

use std::time::Duration;

use serde_json::Value;
use uuid::Uuid;

use gigacheck_core::ChatCompletionResponse;

/// Status and body of one API call
///
/// Non-success statuses are not errors here: negative scenarios assert on
/// them.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: u16,
    body: String,
    request_id: Uuid,
    elapsed: Duration,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>, request_id: Uuid, elapsed: Duration) -> Self {
        Self {
            status,
            body: body.into(),
            request_id,
            elapsed,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Correlation identifier the request was sent with
    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Parse the body as untyped JSON
    pub fn json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }

    /// Parse the body as a completion
    pub fn completion(&self) -> Result<ChatCompletionResponse, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
