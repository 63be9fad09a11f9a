use schemars::JsonSchema;
use serde::de::DeserializeOwned;

use crate::EcoActionError;

/// Accumulates constraint violations so a single failure reports all of them.
#[derive(Clone, Debug, Default)]
pub struct Violations {
    items: Vec<String>,
}

impl Violations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(message.into());
    }

    pub fn check(&mut self, condition: bool, message: impl FnOnce() -> String) {
        if !condition {
            self.items.push(message());
        }
    }

    pub fn require_text(&mut self, field: &str, value: &str) {
        self.check(!value.trim().is_empty(), || format!("{field} must not be empty"));
    }

    pub fn require_finite(&mut self, field: &str, value: f64) {
        self.check(value.is_finite(), || format!("{field} must be a finite number"));
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn into_result(self, target: &str) -> Result<(), EcoActionError> {
        if self.items.is_empty() {
            Ok(())
        } else {
            Err(EcoActionError::Validation {
                target: target.to_string(),
                violations: self.items,
            })
        }
    }
}

/// A JSON object shape a model is asked to produce.
///
/// Deserialization already enforces field presence, primitive types and enum
/// membership; `validate` covers what the type system cannot express, such as
/// "exactly one option is correct".
pub trait StructuredOutput: DeserializeOwned + JsonSchema + Send + 'static {
    const NAME: &'static str;

    fn validate(&self, _violations: &mut Violations) {}

    /// Pretty-printed JSON schema embedded in the prompt.
    fn schema_description() -> Result<String, EcoActionError> {
        let schema = schemars::schema_for!(Self);
        Ok(serde_json::to_string_pretty(&schema)?)
    }

    fn checked(self) -> Result<Self, EcoActionError> {
        let mut violations = Violations::new();
        self.validate(&mut violations);
        violations.into_result(Self::NAME)?;
        Ok(self)
    }
}
