//! Carbon-footprint analysis of free-text daily activities.

use std::collections::HashMap;

use chrono::NaiveDate;
use ecoaction_core::{CompletionClient, EcoActionError, StructuredOutput, Value, Violations};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::{default_language, require_text, vars, FlowInput, StructuredFlow};

/// Overall rating of a day's net CO2 impact.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CarbonScore {
    Excellent,
    Good,
    Average,
    Poor,
}

impl CarbonScore {
    /// Bucket for a net impact in kg CO2 (negative means a net reduction).
    pub fn from_net_impact(net_impact: f64) -> Self {
        if net_impact <= -10.0 {
            CarbonScore::Excellent
        } else if net_impact <= -2.0 {
            CarbonScore::Good
        } else if net_impact <= 5.0 {
            CarbonScore::Average
        } else {
            CarbonScore::Poor
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActivityCategory {
    Transport,
    Energy,
    Food,
    Waste,
    Consumption,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ImpactType {
    Emission,
    Reduction,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedActivity {
    pub activity: String,
    pub category: ActivityCategory,
    /// kg CO2; positive for emissions, negative for reductions.
    #[serde(serialize_with = "json_number::serialize")]
    #[schemars(with = "f64")]
    pub carbon_impact: f64,
    #[serde(rename = "type")]
    pub impact_type: ImpactType,
    pub explanation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CarbonAnalysis {
    #[serde(serialize_with = "json_number::serialize")]
    #[schemars(with = "f64")]
    pub total_emissions: f64,
    #[serde(serialize_with = "json_number::serialize")]
    #[schemars(with = "f64")]
    pub total_reductions: f64,
    #[serde(serialize_with = "json_number::serialize")]
    #[schemars(with = "f64")]
    pub net_impact: f64,
    pub activities: Vec<AnalyzedActivity>,
    pub recommendations: Vec<String>,
    pub score: CarbonScore,
    pub summary: String,
}

impl StructuredOutput for CarbonAnalysis {
    const NAME: &'static str = "carbon_analysis";

    fn validate(&self, violations: &mut Violations) {
        violations.require_finite("totalEmissions", self.total_emissions);
        violations.require_finite("totalReductions", self.total_reductions);
        violations.require_finite("netImpact", self.net_impact);
        violations.require_text("summary", &self.summary);

        for (idx, item) in self.activities.iter().enumerate() {
            let n = idx + 1;
            violations.require_text(&format!("activities[{n}].activity"), &item.activity);
            violations.require_finite(&format!("activities[{n}].carbonImpact"), item.carbon_impact);
            let sign_ok = match item.impact_type {
                ImpactType::Emission => item.carbon_impact >= 0.0,
                ImpactType::Reduction => item.carbon_impact <= 0.0,
            };
            violations.check(sign_ok, || {
                format!(
                    "activities[{n}] is a {:?} but has carbonImpact {}",
                    item.impact_type, item.carbon_impact
                )
            });
        }

        for (idx, recommendation) in self.recommendations.iter().enumerate() {
            violations.require_text(&format!("recommendations[{}]", idx + 1), recommendation);
        }

        if self.net_impact.is_finite() {
            let expected = CarbonScore::from_net_impact(self.net_impact);
            if expected != self.score {
                tracing::warn!(
                    net_impact = self.net_impact,
                    score = ?self.score,
                    expected = ?expected,
                    "model score disagrees with net impact bucket"
                );
            }
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CarbonFootprintInput {
    pub activities: String,
    #[serde(default = "default_language")]
    pub language: String,
    pub date: NaiveDate,
}

impl FlowInput for CarbonFootprintInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("activities", &self.activities)?;
        require_text("language", &self.language)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([
            ("activities", Value::from(self.activities.trim())),
            ("language", Value::from(self.language.trim())),
            ("date", Value::from(self.date.to_string())),
        ])
    }
}

const SYSTEM_MESSAGE: &str = "You are an expert environmental scientist specializing in carbon footprint analysis. You accurately calculate carbon emissions and reductions from daily activities, providing practical advice for sustainable living. Always provide responses in the requested language while maintaining scientific accuracy.";

const TEMPLATE: &str = r#"Analyze the following daily activities from {{date}} and calculate their carbon impact:

Activities: "{{activities}}"

Please analyze each activity and:
1. Categorize it (transport, energy, food, waste, consumption)
2. Estimate carbon impact in kg CO2 (positive for emissions, negative for reductions)
3. Provide explanation for the impact
4. Give overall recommendations for improvement

Consider these factors:
- Transportation modes and distances
- Energy usage patterns
- Food choices (local vs imported, vegetarian vs meat)
- Waste management practices
- Consumption habits
- Any eco-friendly activities

Respond in {{language}} language.

Provide a score based on net impact:
- excellent: Net reduction of 10kg CO2 or more
- good: Net reduction between 2 and 10kg CO2
- average: Net impact between -2 and +5kg CO2
- poor: Net emissions above 5kg CO2"#;

pub fn flow() -> StructuredFlow<CarbonFootprintInput, CarbonAnalysis> {
    StructuredFlow::new("analyze_carbon_footprint", TEMPLATE)
        .system_message(SYSTEM_MESSAGE)
        .temperature(1.0)
}

pub async fn analyze_carbon_footprint(
    client: &CompletionClient,
    input: &CarbonFootprintInput,
) -> Result<CarbonAnalysis, EcoActionError> {
    flow().run(client, input).await
}

/// Writes integral values without a fractional part so a response body
/// round-trips the numbers a model produced (`0`, not `0.0`).
mod json_number {
    use serde::Serializer;

    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}
