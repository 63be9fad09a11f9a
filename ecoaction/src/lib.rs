//! EcoAction: typed LLM flows for carbon-footprint analysis and
//! sustainability games.
//!
//! ```ignore
//! use ecoaction::prelude::*;
//!
//! let model = AzureOpenAiClient::new(AzureOpenAiConfig::from_env()?)?;
//! let client = CompletionClient::from_model(model);
//! let quiz = generate_carbon_quiz(&client, &CarbonQuizInput { count: 5, language: "English".into() }).await?;
//! ```

pub use ecoaction_core as core;
pub use ecoaction_flows as flows;
pub use ecoaction_prompt as prompt;

#[cfg(feature = "azure")]
pub use ecoaction_llm as llm;

#[cfg(feature = "server")]
pub use ecoaction_server as server;

pub mod prelude {
    pub use ecoaction_core::{
        ChatModel, CompletionClient, CompletionOptions, EcoActionError, Retrying,
        StructuredOutput,
    };
    pub use ecoaction_flows::*;
    pub use ecoaction_prompt::PromptTemplate;

    #[cfg(feature = "azure")]
    pub use ecoaction_llm::{AzureOpenAiClient, AzureOpenAiConfig};
}
