use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::error::Category;
use serde_json::Value;

use crate::{EcoActionError, LlmResponse};

const MAX_ECHOED_OUTPUT: usize = 512;

/// Parses JSON text (or `LlmResponse` content) into a structured type or `Value`.
///
/// Models sometimes wrap JSON in a markdown code fence even in JSON mode; the
/// fence is stripped before parsing.
#[derive(Clone, Debug, Default)]
pub struct JsonOutputParser<T = Value> {
    _marker: PhantomData<T>,
}

impl<T> JsonOutputParser<T> {
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: DeserializeOwned> JsonOutputParser<T> {
    pub fn parse(&self, input: &str) -> Result<T, EcoActionError> {
        let cleaned = strip_code_fence(input);
        serde_json::from_str(cleaned).map_err(|err| {
            let reason = match err.classify() {
                Category::Syntax | Category::Eof => format!("not valid JSON: {err}"),
                Category::Data => format!("JSON does not match expected shape: {err}"),
                Category::Io => err.to_string(),
            };
            EcoActionError::ParseFailed {
                output: truncate(cleaned),
                reason,
            }
        })
    }

    pub fn parse_response(&self, response: &LlmResponse) -> Result<T, EcoActionError> {
        self.parse(&response.content)
    }
}

pub fn strip_code_fence(input: &str) -> &str {
    let cleaned = input.trim();
    if cleaned.starts_with("```json") {
        cleaned
            .trim_start_matches("```json")
            .trim_end_matches("```")
            .trim()
    } else if cleaned.starts_with("```") {
        cleaned
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim()
    } else {
        cleaned
    }
}

fn truncate(output: &str) -> String {
    match output.char_indices().nth(MAX_ECHOED_OUTPUT) {
        Some((idx, _)) => format!("{}...", &output[..idx]),
        None => output.to_string(),
    }
}
