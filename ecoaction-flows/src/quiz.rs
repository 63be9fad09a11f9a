//! Multiple-choice quizzes and single-choice scenarios.

use std::collections::HashMap;

use ecoaction_core::{CompletionClient, EcoActionError, StructuredOutput, Value, Violations};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::{default_language, require_range, require_text, vars, FlowInput, StructuredFlow};

pub const QUIZ_OPTION_COUNT: usize = 4;
pub const SITUATION_OPTION_COUNT: usize = 3;
pub const MAX_QUIZ_QUESTIONS: u32 = 20;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceOption {
    pub text: String,
    pub is_correct: bool,
    /// Shown after the option is picked.
    pub feedback: String,
}

/// Checks a choice list has `expected` options, exactly one of them correct.
fn check_choices(label: &str, options: &[ChoiceOption], expected: usize, violations: &mut Violations) {
    violations.check(options.len() == expected, || {
        format!("{label} has {} options, expected {expected}", options.len())
    });
    let correct = options.iter().filter(|o| o.is_correct).count();
    violations.check(correct == 1, || {
        format!("{label} has {correct} correct options, expected exactly 1")
    });
    for (idx, option) in options.iter().enumerate() {
        violations.require_text(&format!("{label} option {} text", idx + 1), &option.text);
        violations.require_text(&format!("{label} option {} feedback", idx + 1), &option.feedback);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<ChoiceOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CarbonQuiz {
    pub questions: Vec<QuizQuestion>,
}

impl StructuredOutput for CarbonQuiz {
    const NAME: &'static str = "carbon_quiz";

    fn validate(&self, violations: &mut Violations) {
        violations.check(!self.questions.is_empty(), || "quiz has no questions".to_string());
        for (idx, question) in self.questions.iter().enumerate() {
            let label = format!("question {}", idx + 1);
            violations.require_text(&label, &question.question);
            check_choices(&label, &question.options, QUIZ_OPTION_COUNT, violations);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct CarbonQuizInput {
    pub count: u32,
    #[serde(default = "default_language")]
    pub language: String,
}

impl FlowInput for CarbonQuizInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_range("count", self.count, 1, MAX_QUIZ_QUESTIONS)?;
        require_text("language", &self.language)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([
            ("count", Value::from(self.count)),
            ("language", Value::from(self.language.trim())),
        ])
    }
}

const QUIZ_TEMPLATE: &str = r#"You are an expert in environmental science, creating a quiz about reducing carbon emissions.

Generate a list of {{count}} quiz questions in {{language}}. Each question should be about a practical way to reduce one's carbon footprint.

For each question, provide:
- A clear, concise question.
- Exactly four options. One must be correct, the others should be plausible but incorrect.
- For each option, brief feedback explaining why it is correct or incorrect. The feedback for the correct answer should include a reward, for example 'Correct! You earned 10 eco-points!'."#;

fn quiz_has_requested_count(input: &CarbonQuizInput, output: &CarbonQuiz, violations: &mut Violations) {
    violations.check(output.questions.len() == input.count as usize, || {
        format!(
            "quiz has {} questions, {} were requested",
            output.questions.len(),
            input.count
        )
    });
}

pub fn quiz_flow() -> StructuredFlow<CarbonQuizInput, CarbonQuiz> {
    StructuredFlow::new("generate_carbon_quiz", QUIZ_TEMPLATE).with_check(quiz_has_requested_count)
}

pub async fn generate_carbon_quiz(
    client: &CompletionClient,
    input: &CarbonQuizInput,
) -> Result<CarbonQuiz, EcoActionError> {
    quiz_flow().run(client, input).await
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct EcoSituation {
    pub title: String,
    pub description: String,
    pub options: Vec<ChoiceOption>,
}

impl StructuredOutput for EcoSituation {
    const NAME: &'static str = "eco_situation";

    fn validate(&self, violations: &mut Violations) {
        violations.require_text("title", &self.title);
        violations.require_text("description", &self.description);
        check_choices("situation", &self.options, SITUATION_OPTION_COUNT, violations);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EcoSituationInput {
    pub theme: String,
}

impl FlowInput for EcoSituationInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("theme", &self.theme)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([("theme", Value::from(self.theme.trim()))])
    }
}

const SITUATION_TEMPLATE: &str = r#"You are a game designer creating scenarios for an educational game about sustainability and environmental civic sense.

Generate a scenario based on the theme of {{theme}}.

The scenario should present a common, everyday situation where a person can make a choice that impacts the environment.

Provide a concise title, a description of the situation, and exactly three options.
- One option should be the most sustainable choice; mark it as correct.
- The other two options should be common but less sustainable alternatives.
- For each option, provide brief, educational feedback explaining the consequence or benefit of that choice. The feedback for the correct answer should include a reward, for example 'You earned 10 eco-points!'."#;

pub fn situation_flow() -> StructuredFlow<EcoSituationInput, EcoSituation> {
    StructuredFlow::new("generate_eco_situation", SITUATION_TEMPLATE)
}

pub async fn generate_eco_situation(
    client: &CompletionClient,
    input: &EcoSituationInput,
) -> Result<EcoSituation, EcoActionError> {
    situation_flow().run(client, input).await
}
