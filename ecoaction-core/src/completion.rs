//! The single chokepoint between prompt flows and a hosted chat model.

use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::{
    ChatModel, EcoActionError, JsonOutputParser, LlmRequest, LlmResponse, Message,
    ResponseFormat, StructuredOutput,
};

pub const DEFAULT_SYSTEM_MESSAGE: &str = "You are a helpful assistant.";
pub const DEFAULT_STRUCTURED_SYSTEM_MESSAGE: &str =
    "You are a helpful assistant that responds with valid JSON.";
pub const DEFAULT_TEMPERATURE: f32 = 1.0;
pub const DEFAULT_MAX_TOKENS: u32 = 32_000;
pub const DEFAULT_STRUCTURED_MAX_TOKENS: u32 = 72_000;

/// Per-call overrides. Unset fields fall back to the defaults of the entry
/// point being called.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CompletionOptions {
    pub system_message: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn system_message(mut self, value: impl Into<String>) -> Self {
        self.system_message = Some(value.into());
        self
    }

    pub fn temperature(mut self, value: f32) -> Self {
        self.temperature = Some(value);
        self
    }

    pub fn max_tokens(mut self, value: u32) -> Self {
        self.max_tokens = Some(value);
        self
    }
}

/// Appends the schema and the JSON-only instruction to a task prompt.
pub fn structured_prompt(prompt: &str, schema_description: &str) -> String {
    format!(
        "{prompt}\n\nPlease respond with a valid JSON object that matches this schema:\n{schema_description}\n\nImportant: Only return valid JSON, no additional text or explanation."
    )
}

#[derive(Clone)]
pub struct CompletionClient {
    model: Arc<dyn ChatModel>,
}

impl CompletionClient {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    pub fn from_model<M: ChatModel>(model: M) -> Self {
        Self::new(Arc::new(model))
    }

    /// Plain-text completion of a single prompt.
    pub async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, EcoActionError> {
        let system = options
            .system_message
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_MESSAGE);
        let request = LlmRequest {
            model: String::new(),
            messages: vec![Message::system(system), Message::user(prompt)],
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            response_format: ResponseFormat::Text,
        };
        let response = self.send(request).await?;
        Ok(response.content)
    }

    /// Plain-text completion over a caller-supplied history. No system
    /// message is injected.
    pub async fn complete_conversation(
        &self,
        messages: Vec<Message>,
        options: &CompletionOptions,
    ) -> Result<String, EcoActionError> {
        if messages.is_empty() {
            return Err(EcoActionError::InvalidInput(
                "conversation must contain at least one message".to_string(),
            ));
        }
        let request = LlmRequest {
            model: String::new(),
            messages,
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            response_format: ResponseFormat::Text,
        };
        let response = self.send(request).await?;
        Ok(response.content)
    }

    /// JSON-mode completion parsed into `T`. The schema description is only
    /// shown to the model; nothing beyond deserialization checks it.
    pub async fn complete_structured<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema_description: &str,
        options: &CompletionOptions,
    ) -> Result<T, EcoActionError> {
        let system = options
            .system_message
            .as_deref()
            .unwrap_or(DEFAULT_STRUCTURED_SYSTEM_MESSAGE);
        let request = LlmRequest {
            model: String::new(),
            messages: vec![
                Message::system(system),
                Message::user(structured_prompt(prompt, schema_description)),
            ],
            temperature: options.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_tokens: options.max_tokens.unwrap_or(DEFAULT_STRUCTURED_MAX_TOKENS),
            response_format: ResponseFormat::JsonObject,
        };
        let response = self.send(request).await?;
        if response.content.trim().is_empty() {
            return Err(EcoActionError::EmptyCompletion);
        }
        JsonOutputParser::<T>::new().parse_response(&response)
    }

    /// Structured completion whose schema comes from `T` and whose result is
    /// validated before it is returned.
    pub async fn complete_validated<T: StructuredOutput>(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<T, EcoActionError> {
        let schema = T::schema_description()?;
        let parsed: T = self.complete_structured(prompt, &schema, options).await?;
        parsed.checked()
    }

    async fn send(&self, request: LlmRequest) -> Result<LlmResponse, EcoActionError> {
        tracing::debug!(
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            json_mode = request.response_format == ResponseFormat::JsonObject,
            messages = request.messages.len(),
            "sending chat completion"
        );
        tracing::trace!(messages = ?request.messages, "chat completion prompt");

        let response = self.model.invoke(request).await?;

        tracing::debug!(
            content_len = response.content.len(),
            finish_reason = ?response.finish_reason,
            total_tokens = response.usage.as_ref().map(|u| u.total_tokens),
            "chat completion received"
        );
        tracing::trace!(content = %response.content, "chat completion content");
        Ok(response)
    }
}

impl std::fmt::Debug for CompletionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionClient").finish_non_exhaustive()
    }
}
