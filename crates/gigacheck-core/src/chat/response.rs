use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Successful `chat/completions` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    /// First choice, which is what every scenario inspects
    pub fn first_choice(&self) -> Option<&Choice> {
        self.choices.first()
    }

    /// Text of the first choice, empty when there is none
    pub fn text(&self) -> &str {
        self.first_choice()
            .map(|c| c.message.content.as_str())
            .unwrap_or_default()
    }

    /// Role tag of the first choice
    pub fn role(&self) -> Option<&str> {
        self.first_choice().map(|c| c.message.role.as_str())
    }
}

/// One generated alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: FinishReason,
}

/// Message inside a choice
///
/// The role stays a plain string: the service may answer with roles the
/// request side never sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMessage {
    pub role: String,
    pub content: String,
}

/// Token usage information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Create usage with a computed total
    pub fn new(prompt: u32, completion: u32) -> Self {
        Self {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        }
    }

    /// `total_tokens == prompt_tokens + completion_tokens`
    pub fn is_consistent(&self) -> bool {
        self.prompt_tokens
            .checked_add(self.completion_tokens)
            .is_some_and(|sum| sum == self.total_tokens)
    }
}

/// Why generation stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinishReason {
    /// Completed naturally
    Stop,
    /// Hit token limit
    Length,
    /// Model asked to call a function
    FunctionCall,
    /// Answer replaced by the service's content filter
    Blacklist,
    /// Error occurred
    Error,
    /// Anything the service adds later
    Other(String),
}

impl FinishReason {
    /// Convert from string
    pub fn parse(s: &str) -> Self {
        match s {
            "stop" => Self::Stop,
            "length" => Self::Length,
            "function_call" => Self::FunctionCall,
            "blacklist" => Self::Blacklist,
            "error" => Self::Error,
            other => Self::Other(other.to_string()),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::FunctionCall => "function_call",
            Self::Blacklist => "blacklist",
            Self::Error => "error",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::parse(&s))
    }
}
