//! Personalized carbon-reduction suggestions from a lifestyle description.

use std::collections::HashMap;

use ecoaction_core::{CompletionClient, EcoActionError, StructuredOutput, Value, Violations};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::{default_language, require_text, vars, FlowInput, StructuredFlow};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CarbonSuggestion {
    pub category: String,
    pub suggestion: String,
    pub impact: ImpactLevel,
    pub difficulty: Difficulty,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonSuggestions {
    pub suggestions: Vec<CarbonSuggestion>,
    pub summary: String,
    /// Free text such as "about 1.5 tonnes CO2 per year".
    pub total_estimated_reduction: String,
}

impl StructuredOutput for CarbonSuggestions {
    const NAME: &'static str = "carbon_suggestions";

    fn validate(&self, violations: &mut Violations) {
        violations.check(!self.suggestions.is_empty(), || {
            "at least one suggestion is required".to_string()
        });
        violations.require_text("summary", &self.summary);
        violations.require_text("totalEstimatedReduction", &self.total_estimated_reduction);
        for (idx, item) in self.suggestions.iter().enumerate() {
            let n = idx + 1;
            violations.require_text(&format!("suggestions[{n}].category"), &item.category);
            violations.require_text(&format!("suggestions[{n}].suggestion"), &item.suggestion);
            violations.require_text(&format!("suggestions[{n}].description"), &item.description);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CarbonSuggestionsInput {
    pub lifestyle: String,
    #[serde(default)]
    pub habits: String,
    #[serde(default = "default_language")]
    pub language: String,
}

impl FlowInput for CarbonSuggestionsInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("lifestyle", &self.lifestyle)?;
        require_text("language", &self.language)
    }

    fn variables(&self) -> HashMap<String, Value> {
        let habits = match self.habits.trim() {
            "" => "Not specified",
            habits => habits,
        };
        vars([
            ("lifestyle", Value::from(self.lifestyle.trim())),
            ("habits", Value::from(habits)),
            ("language", Value::from(self.language.trim())),
        ])
    }
}

const SYSTEM_MESSAGE: &str = "You are a sustainability coach who gives specific, practical and encouraging advice for reducing personal carbon emissions. Always respond in the requested language.";

const TEMPLATE: &str = r#"Based on the user's lifestyle and habits, suggest actionable ways for them to minimize their environmental impact. Consider transportation, diet, energy consumption at home, and waste management.

Lifestyle: {{lifestyle}}
Habits: {{habits}}

For each suggestion provide:
- category: the area of life it concerns (for example Transportation, Diet, Energy, Waste)
- suggestion: a short, concrete action
- impact: how much it reduces emissions (high, medium or low)
- difficulty: how hard it is to adopt (easy, medium or hard)
- description: a practical explanation of how to do it and why it helps

Give between 5 and 8 suggestions, a short overall summary, and an estimate of the total yearly reduction if all suggestions are followed.

Respond in {{language}} language."#;

pub fn flow() -> StructuredFlow<CarbonSuggestionsInput, CarbonSuggestions> {
    StructuredFlow::new("carbon_emission_suggestions", TEMPLATE).system_message(SYSTEM_MESSAGE)
}

pub async fn carbon_emission_suggestions(
    client: &CompletionClient,
    input: &CarbonSuggestionsInput,
) -> Result<CarbonSuggestions, EcoActionError> {
    flow().run(client, input).await
}
