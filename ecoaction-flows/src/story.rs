//! Fill-in-the-blanks eco stories and their evaluation.

use std::collections::{BTreeSet, HashMap};

use ecoaction_core::{CompletionClient, EcoActionError, StructuredOutput, Value, Violations};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::{require_text, vars, FlowInput, StructuredFlow};

pub const MIN_BLANKS: usize = 4;
pub const MAX_BLANKS: usize = 6;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EcoStory {
    pub title: String,
    /// Story text with numbered blanks `[1]`, `[2]`, ...
    pub story_template: String,
    /// Answers for the blanks, in blank order.
    pub correct_words: Vec<String>,
    /// Plausible distractors, one per blank.
    pub incorrect_words: Vec<String>,
}

impl EcoStory {
    /// Distinct blank numbers found in the template, ascending.
    pub fn placeholders(&self) -> Result<BTreeSet<usize>, EcoActionError> {
        let pattern = Regex::new(r"\[(\d+)\]")
            .map_err(|e| EcoActionError::InvalidConfig(e.to_string()))?;
        Ok(pattern
            .captures_iter(&self.story_template)
            .filter_map(|caps| caps[1].parse().ok())
            .collect())
    }
}

impl StructuredOutput for EcoStory {
    const NAME: &'static str = "eco_story";

    fn validate(&self, violations: &mut Violations) {
        violations.require_text("title", &self.title);
        violations.require_text("storyTemplate", &self.story_template);

        let blanks = match self.placeholders() {
            Ok(blanks) => blanks,
            Err(err) => {
                violations.push(format!("storyTemplate blanks could not be read: {err}"));
                return;
            }
        };
        let n = blanks.len();
        violations.check((MIN_BLANKS..=MAX_BLANKS).contains(&n), || {
            format!("story has {n} blanks, expected {MIN_BLANKS} to {MAX_BLANKS}")
        });
        violations.check(blanks.iter().copied().eq(1..=n), || {
            format!("blanks must be numbered [1]..[{n}], found {blanks:?}")
        });
        violations.check(self.correct_words.len() == n, || {
            format!(
                "story has {n} blanks but {} correct words",
                self.correct_words.len()
            )
        });
        violations.check(self.incorrect_words.len() == n, || {
            format!(
                "story has {n} blanks but {} incorrect words",
                self.incorrect_words.len()
            )
        });
        for (idx, word) in self.correct_words.iter().enumerate() {
            violations.require_text(&format!("correctWords[{}]", idx + 1), word);
        }
        for (idx, word) in self.incorrect_words.iter().enumerate() {
            violations.require_text(&format!("incorrectWords[{}]", idx + 1), word);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EcoStoryInput {
    pub theme: String,
}

impl FlowInput for EcoStoryInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("theme", &self.theme)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([("theme", Value::from(self.theme.trim()))])
    }
}

const STORY_TEMPLATE: &str = r#"You are a creative storyteller and environmental educator. Create a short, engaging, fill-in-the-blanks story for a game based on the theme of {{theme}}.

The story should be a few paragraphs long and have between 4 and 6 blanks. Represent the blanks with numbered placeholders ("[1]", "[2]", ...), each number used once and in order.

- Provide a catchy title for the story.
- Provide the story template.
- Provide the array of correct words that fit the blanks, in order. The words should be relevant to the theme.
- Provide an array of incorrect words. These should be plausible distractors that are contextually related but wrong. The number of incorrect words must equal the number of correct words."#;

pub fn story_flow() -> StructuredFlow<EcoStoryInput, EcoStory> {
    StructuredFlow::new("generate_eco_story", STORY_TEMPLATE)
}

pub async fn generate_eco_story(
    client: &CompletionClient,
    input: &EcoStoryInput,
) -> Result<EcoStory, EcoActionError> {
    story_flow().run(client, input).await
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StoryEvaluation {
    /// Feedback on the chosen words and a closing paragraph.
    pub evaluation: String,
}

impl StructuredOutput for StoryEvaluation {
    const NAME: &'static str = "story_evaluation";

    fn validate(&self, violations: &mut Violations) {
        violations.require_text("evaluation", &self.evaluation);
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EvaluateStoryInput {
    /// The story with every blank filled in.
    pub story: String,
}

impl FlowInput for EvaluateStoryInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("story", &self.story)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([("story", Value::from(self.story.trim()))])
    }
}

const EVALUATE_TEMPLATE: &str = r#"You are an environmental expert. The user has completed a fill-in-the-blanks story.

User's completed story:
"{{story}}"

Based on the choices the user filled in, provide a concluding paragraph.
- Evaluate the choices made, even if they are incorrect distractors.
- Explain the environmental impact of the correct actions.
- If the user made wrong choices, gently correct them and explain the better alternative.
- Make the tone encouraging and educational."#;

pub fn evaluate_flow() -> StructuredFlow<EvaluateStoryInput, StoryEvaluation> {
    StructuredFlow::new("evaluate_eco_story", EVALUATE_TEMPLATE)
}

pub async fn evaluate_eco_story(
    client: &CompletionClient,
    input: &EvaluateStoryInput,
) -> Result<StoryEvaluation, EcoActionError> {
    evaluate_flow().run(client, input).await
}
