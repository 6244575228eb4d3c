//! Per-case step recorder and shared assertions

use std::time::Instant;

use gigacheck_client::{ApiResponse, ClientError, Session};
use gigacheck_core::{validate_chat_completion, ChatCompletionRequest, ChatCompletionResponse, SchemaError};

use crate::report::{Attachment, StepRecord, StepStatus};

/// Why a case did not pass
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("{0}")]
    Assertion(String),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("request failed: {0}")]
    Transport(#[from] ClientError),

    #[error("response body is not a completion: {0}")]
    Decode(String),
}

/// Fail with `message` unless `condition` holds
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Assertion(message()))
    }
}

/// Steps and attachments collected while one case runs
#[derive(Debug, Default)]
pub struct ScenarioContext {
    steps: Vec<StepRecord>,
    attachments: Vec<Attachment>,
}

impl ScenarioContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a synchronous check as a named step
    pub fn step<T>(
        &mut self,
        name: impl Into<String>,
        check: impl FnOnce() -> Result<T, ScenarioError>,
    ) -> Result<T, ScenarioError> {
        let started = Instant::now();
        let result = check();
        self.record(name.into(), started, result.as_ref().err().map(ToString::to_string));
        result
    }

    /// Send `payload` and attach both bodies
    pub async fn send(
        &mut self,
        session: &Session,
        payload: &ChatCompletionRequest,
    ) -> Result<ApiResponse, ScenarioError> {
        let started = Instant::now();
        let name = format!("POST {}", session.chat_completions_url());

        if let Ok(body) = serde_json::to_string_pretty(payload) {
            self.attach("request_body", "application/json", body);
        }

        let result = session.post_chat_completions(payload).await;
        match &result {
            Ok(response) => {
                self.attach("response_body", "application/json", response.body().to_string());
                self.record(name, started, None);
            }
            Err(e) => self.record(name, started, Some(e.to_string())),
        }
        Ok(result?)
    }

    /// Status must equal `expected`
    pub fn expect_status(&mut self, response: &ApiResponse, expected: u16) -> Result<(), ScenarioError> {
        self.step(format!("Check status is {}", expected), || {
            ensure(response.status() == expected, || {
                format!(
                    "expected status {}, got {}. Body: {}",
                    expected,
                    response.status(),
                    response.body()
                )
            })
        })
    }

    /// Status must be one of `allowed`
    pub fn expect_status_in(&mut self, response: &ApiResponse, allowed: &[u16]) -> Result<(), ScenarioError> {
        self.step(format!("Check status is one of {:?}", allowed), || {
            ensure(allowed.contains(&response.status()), || {
                format!(
                    "expected one of {:?}, got {}. Body: {}",
                    allowed,
                    response.status(),
                    response.body()
                )
            })
        })
    }

    /// Body must be JSON matching the completion schema
    pub fn expect_completion(&mut self, response: &ApiResponse) -> Result<ChatCompletionResponse, ScenarioError> {
        self.step("Check response schema", || {
            let body = response
                .json()
                .map_err(|e| ScenarioError::Decode(e.to_string()))?;
            validate_chat_completion(&body)?;
            serde_json::from_value(body).map_err(|e| ScenarioError::Decode(e.to_string()))
        })
    }

    /// total_tokens == prompt_tokens + completion_tokens
    pub fn expect_consistent_usage(&mut self, completion: &ChatCompletionResponse) -> Result<(), ScenarioError> {
        let usage = completion.usage;
        self.step("Check usage arithmetic", || {
            ensure(usage.is_consistent(), || {
                format!(
                    "total_tokens {} != prompt_tokens {} + completion_tokens {}",
                    usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
                )
            })
        })
    }

    pub fn attach(&mut self, name: &str, mime_type: &str, content: String) {
        self.attachments.push(Attachment {
            name: name.to_string(),
            mime_type: mime_type.to_string(),
            content,
        });
    }

    pub fn steps(&self) -> &[StepRecord] {
        &self.steps
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Hand the collected records to the report
    pub fn into_parts(self) -> (Vec<StepRecord>, Vec<Attachment>) {
        (self.steps, self.attachments)
    }

    fn record(&mut self, name: String, started: Instant, error: Option<String>) {
        let status = if error.is_some() {
            StepStatus::Failed
        } else {
            StepStatus::Passed
        };
        if let Some(ref e) = error {
            tracing::debug!(step = %name, error = %e, "Step failed");
        }
        self.steps.push(StepRecord {
            name,
            status,
            duration_ms: started.elapsed().as_millis() as u64,
            error,
        });
    }
}
