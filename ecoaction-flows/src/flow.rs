use std::collections::HashMap;
use std::marker::PhantomData;

use ecoaction_core::{
    CompletionClient, CompletionOptions, EcoActionError, StructuredOutput, Value, Violations,
};
use ecoaction_prompt::PromptTemplate;
use tracing::Instrument;

/// Typed input of a flow.
pub trait FlowInput: Send + Sync {
    /// Rejects input the prompt cannot be built from. Runs before any
    /// outbound call.
    fn validate(&self) -> Result<(), EcoActionError> {
        Ok(())
    }

    /// Values for the prompt template placeholders.
    fn variables(&self) -> HashMap<String, Value>;
}

/// Output check that needs the input, e.g. "as many questions as requested".
pub type InputCheck<I, O> = fn(&I, &O, &mut Violations);

/// Build prompt, describe schema, call, validate.
///
/// Every generator in this crate is one instance of this type; they differ
/// only in template, system message, and checks.
pub struct StructuredFlow<I, O> {
    name: &'static str,
    template: PromptTemplate,
    options: CompletionOptions,
    check: Option<InputCheck<I, O>>,
    _marker: PhantomData<fn(&I) -> O>,
}

impl<I, O> StructuredFlow<I, O>
where
    I: FlowInput,
    O: StructuredOutput,
{
    pub fn new(name: &'static str, template: &str) -> Self {
        Self {
            name,
            template: PromptTemplate::new(template),
            options: CompletionOptions::new(),
            check: None,
            _marker: PhantomData,
        }
    }

    pub fn system_message(mut self, value: &str) -> Self {
        self.options = self.options.system_message(value);
        self
    }

    pub fn temperature(mut self, value: f32) -> Self {
        self.options = self.options.temperature(value);
        self
    }

    pub fn max_tokens(mut self, value: u32) -> Self {
        self.options = self.options.max_tokens(value);
        self
    }

    pub fn with_check(mut self, check: InputCheck<I, O>) -> Self {
        self.check = Some(check);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn options(&self) -> &CompletionOptions {
        &self.options
    }

    /// The task prompt for `input`, before the schema suffix is appended.
    pub fn prompt(&self, input: &I) -> Result<String, EcoActionError> {
        input.validate()?;
        self.template.render(&input.variables())
    }

    pub async fn run(&self, client: &CompletionClient, input: &I) -> Result<O, EcoActionError> {
        let prompt = self.prompt(input)?;
        let span = tracing::info_span!("flow", flow = self.name);

        async {
            let output: O = client.complete_validated(&prompt, &self.options).await?;
            if let Some(check) = self.check {
                let mut violations = Violations::new();
                check(input, &output, &mut violations);
                violations.into_result(O::NAME)?;
            }
            tracing::debug!("flow produced valid output");
            Ok::<O, EcoActionError>(output)
        }
        .instrument(span)
        .await
        .map_err(|err| {
            tracing::warn!(flow = self.name, kind = err.kind(), error = %err, "flow failed");
            err
        })
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), EcoActionError> {
    if value.trim().is_empty() {
        return Err(EcoActionError::InvalidInput(format!("{field} is required")));
    }
    Ok(())
}

pub(crate) fn require_range(field: &str, value: u32, min: u32, max: u32) -> Result<(), EcoActionError> {
    if value < min || value > max {
        return Err(EcoActionError::InvalidInput(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn vars<const N: usize>(pairs: [(&str, Value); N]) -> HashMap<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

pub fn default_language() -> String {
    "English".to_string()
}
