use std::collections::{BTreeSet, HashMap};

use ecoaction_core::{EcoActionError, Value};
use regex::{Captures, Regex};

fn placeholder_pattern() -> Result<Regex, EcoActionError> {
    Regex::new(r"\{\{\s*(\w+)\s*\}\}").map_err(|e| EcoActionError::InvalidConfig(e.to_string()))
}

/// A prompt with `{{name}}` placeholders. Rendering fails when any
/// placeholder has no value.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Placeholder names in first-seen order, without duplicates.
    pub fn variables(&self) -> Result<Vec<String>, EcoActionError> {
        let mut seen = BTreeSet::new();
        Ok(placeholder_pattern()?
            .captures_iter(&self.template)
            .filter_map(|caps| {
                let name = caps[1].to_string();
                seen.insert(name.clone()).then_some(name)
            })
            .collect())
    }

    pub fn render(&self, vars: &HashMap<String, Value>) -> Result<String, EcoActionError> {
        let missing: Vec<String> = self
            .variables()?
            .into_iter()
            .filter(|name| !vars.contains_key(name))
            .collect();
        if !missing.is_empty() {
            return Err(EcoActionError::InvalidConfig(format!(
                "prompt template variables not provided: {}",
                missing.join(", ")
            )));
        }

        let pattern = placeholder_pattern()?;
        let rendered = pattern.replace_all(&self.template, |caps: &Captures| {
            match vars.get(&caps[1]) {
                Some(value) => value
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| value.to_string()),
                None => String::new(),
            }
        });
        Ok(rendered.into_owned())
    }
}
