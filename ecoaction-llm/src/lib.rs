//! Azure OpenAI chat-completion client for EcoAction.
//!
//! Environment variables read by [`AzureOpenAiConfig::from_env`]:
//! - `AZURE_ENDPOINT`
//! - `DEPLOYMENT_NAME`
//! - `OPENAI_VERSION`
//! - `OPENAI_API_KEY`

mod azure;
mod config;
pub mod wire;

pub use azure::AzureOpenAiClient;
pub use config::{
    AzureOpenAiConfig, AzureOpenAiConfigBuilder, ENV_API_KEY, ENV_API_VERSION, ENV_DEPLOYMENT,
    ENV_ENDPOINT,
};
pub use ecoaction_core::{ChatModel, LlmRequest, LlmResponse, Message, ResponseFormat, Role};
