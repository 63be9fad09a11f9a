use std::time::Duration;

use tokio::time::sleep;

use crate::{ChatModel, EcoActionError, LlmRequest, LlmResponse};

const INITIAL_BACKOFF: Duration = Duration::from_millis(200);

/// Retries transient failures of the wrapped model. Parse and validation
/// failures never reach this layer, so a bad answer is not re-requested.
pub struct Retrying<M> {
    model: M,
    max_attempts: usize,
    backoff: Duration,
}

impl<M> Retrying<M> {
    pub fn new(model: M, max_attempts: usize) -> Self {
        Self {
            model,
            max_attempts,
            backoff: INITIAL_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

pub fn is_retryable(error: &EcoActionError) -> bool {
    match error {
        EcoActionError::Transport(_) | EcoActionError::Timeout(_) => true,
        EcoActionError::Api { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[async_trait::async_trait]
impl<M: ChatModel> ChatModel for Retrying<M> {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, EcoActionError> {
        if self.max_attempts == 0 {
            return Err(EcoActionError::MaxRetriesExceeded { max: 0 });
        }

        let mut backoff = self.backoff;
        for attempt in 1..=self.max_attempts {
            match self.model.invoke(request.clone()).await {
                Ok(output) => return Ok(output),
                Err(error) => {
                    if !is_retryable(&error) {
                        return Err(error);
                    }
                    if attempt == self.max_attempts {
                        if self.max_attempts == 1 {
                            return Err(error);
                        }
                        return Err(EcoActionError::MaxRetriesExceeded {
                            max: self.max_attempts,
                        });
                    }
                    tracing::warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "transient completion failure; retrying"
                    );
                    sleep(backoff).await;
                    backoff = backoff.saturating_mul(2);
                }
            }
        }

        Err(EcoActionError::MaxRetriesExceeded {
            max: self.max_attempts,
        })
    }
}
