//! # gigacheck-core
//!
//! Wire types for the `chat/completions` contract and the structural
//! schema every successful response is checked against.

pub mod chat;
pub mod error;
pub mod schema;

pub use chat::{
    ChatCompletionRequest, ChatCompletionResponse, Choice, FinishReason, Message,
    ResponseMessage, Role, Usage,
};
pub use error::SchemaError;
pub use schema::{chat_completion_schema, validate, validate_chat_completion};

/// Path of the completion endpoint, relative to the API base URL
pub const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Join a base URL and an endpoint path without doubling the slash
pub fn endpoint_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
