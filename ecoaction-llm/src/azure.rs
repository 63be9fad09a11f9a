use std::time::Duration;

use ecoaction_core::{ChatModel, EcoActionError, LlmRequest, LlmResponse};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::Instrument;
use url::Url;

use crate::wire::{ChatCompletionRequest, ChatCompletionResponse, OpenAiError, ResponseFormatParam};
use crate::AzureOpenAiConfig;

/// Chat-completion client for one Azure OpenAI deployment.
#[derive(Clone)]
pub struct AzureOpenAiClient {
    http: Client,
    url: Url,
    deployment: String,
    api_key: SecretString,
    timeout: Duration,
}

impl std::fmt::Debug for AzureOpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureOpenAiClient")
            .field("url", &self.url.as_str())
            .field("deployment", &self.deployment)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AzureOpenAiClient {
    pub fn new(config: AzureOpenAiConfig) -> Result<Self, EcoActionError> {
        let url = config.chat_completions_url()?;
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| EcoActionError::LlmProvider(err.to_string()))?;
        Ok(Self {
            http,
            url,
            deployment: config.deployment,
            api_key: config.api_key,
            timeout: config.timeout,
        })
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn send(&self, input: LlmRequest) -> Result<LlmResponse, EcoActionError> {
        let LlmRequest {
            model,
            messages,
            temperature,
            max_tokens,
            response_format,
        } = input;
        let model = if model.is_empty() {
            self.deployment.clone()
        } else {
            model
        };
        let request = ChatCompletionRequest {
            model,
            messages,
            temperature,
            max_completion_tokens: max_tokens,
            response_format: ResponseFormatParam::from_format(response_format),
        };

        let response = self
            .http
            .post(self.url.clone())
            .header("api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    EcoActionError::Timeout(self.timeout)
                } else {
                    EcoActionError::Transport(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&body)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| {
                    if body.trim().is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("unknown error")
                            .to_string()
                    } else {
                        body
                    }
                });
            return Err(EcoActionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| EcoActionError::LlmProvider(format!("malformed response: {err}")))?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EcoActionError::LlmProvider("no choices returned".to_string()))?;

        Ok(LlmResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: completion.usage.map(Into::into),
        })
    }
}

#[async_trait::async_trait]
impl ChatModel for AzureOpenAiClient {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, EcoActionError> {
        let span = tracing::info_span!(
            "azure_chat_completion",
            deployment = %self.deployment,
            max_tokens = request.max_tokens,
        );
        let result = self.send(request).instrument(span.clone()).await;
        if let Err(err) = &result {
            span.in_scope(|| tracing::warn!(error = %err, kind = err.kind(), "chat completion failed"));
        }
        result
    }
}
