//! Observability errors

/// Observability error type
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ObservabilityError {
    /// Invalid filter directive
    #[error("Logging error: {message}")]
    Logging {
        /// What went wrong
        message: String,
    },

    /// A global subscriber is already installed
    #[error("Initialization error: {message}")]
    Init {
        /// What went wrong
        message: String,
    },
}

impl ObservabilityError {
    /// Create a logging error
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }

    /// Create an initialization error
    pub fn init(message: impl Into<String>) -> Self {
        Self::Init {
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, ObservabilityError>;
