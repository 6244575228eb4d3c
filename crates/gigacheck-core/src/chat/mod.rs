pub mod request;
pub mod response;

pub use request::{ChatCompletionRequest, Message, Role};
pub use response::{ChatCompletionResponse, Choice, FinishReason, ResponseMessage, Usage};
