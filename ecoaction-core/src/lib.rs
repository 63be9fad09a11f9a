mod completion;
mod error;
mod llm;
mod output_parsers;
mod retry;
mod validate;

pub use completion::{
    structured_prompt, CompletionClient, CompletionOptions, DEFAULT_MAX_TOKENS,
    DEFAULT_STRUCTURED_MAX_TOKENS, DEFAULT_STRUCTURED_SYSTEM_MESSAGE, DEFAULT_SYSTEM_MESSAGE,
    DEFAULT_TEMPERATURE,
};
pub use error::EcoActionError;
pub use llm::{ChatModel, LlmRequest, LlmResponse, Message, ResponseFormat, Role, TokenUsage};
pub use output_parsers::{strip_code_fence, JsonOutputParser};
pub use retry::{is_retryable, Retrying};
pub use validate::{StructuredOutput, Violations};

pub type Value = serde_json::Value;
