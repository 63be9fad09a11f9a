use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EcoActionError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("completion api error {status}: {message}")]
    Api { status: u16, message: String },
    #[error("LLM provider failed: {0}")]
    LlmProvider(String),
    #[error("completion returned no content")]
    EmptyCompletion,
    #[error("Parsing failed on output '{output}': {reason}")]
    ParseFailed { output: String, reason: String },
    #[error("{target} failed validation: {}", violations.join("; "))]
    Validation {
        target: String,
        violations: Vec<String>,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
    #[error("Max retries ({max}) exceeded")]
    MaxRetriesExceeded { max: usize },
    #[error("Serialization/deserialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EcoActionError {
    /// Short stable label used in logs and metrics fields.
    pub fn kind(&self) -> &'static str {
        match self {
            EcoActionError::Transport(_) => "transport",
            EcoActionError::Api { .. } => "api",
            EcoActionError::LlmProvider(_) => "provider",
            EcoActionError::EmptyCompletion => "empty_completion",
            EcoActionError::ParseFailed { .. } => "parse",
            EcoActionError::Validation { .. } => "validation",
            EcoActionError::InvalidInput(_) => "invalid_input",
            EcoActionError::InvalidConfig(_) => "config",
            EcoActionError::Timeout(_) => "timeout",
            EcoActionError::MaxRetriesExceeded { .. } => "max_retries",
            EcoActionError::Serde(_) => "serde",
        }
    }

    /// True when the caller supplied bad input rather than the model or
    /// network misbehaving.
    pub fn is_client_error(&self) -> bool {
        matches!(self, EcoActionError::InvalidInput(_))
    }
}
