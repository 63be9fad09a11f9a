//! Word-scramble puzzles.

use std::collections::{HashMap, HashSet};

use ecoaction_core::{CompletionClient, EcoActionError, StructuredOutput, Value, Violations};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::flow::{require_range, require_text, vars, FlowInput, StructuredFlow};

pub const MIN_WORD_LEN: usize = 6;
pub const MAX_WORD_LEN: usize = 10;
pub const MAX_PUZZLES: u32 = 20;

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WordPuzzle {
    /// Uppercase, letters only.
    pub word: String,
    pub hint: String,
    pub explanation: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct WordPuzzles {
    pub puzzles: Vec<WordPuzzle>,
}

impl StructuredOutput for WordPuzzles {
    const NAME: &'static str = "word_puzzles";

    fn validate(&self, violations: &mut Violations) {
        violations.check(!self.puzzles.is_empty(), || "no puzzles returned".to_string());

        let mut seen = HashSet::new();
        for (idx, puzzle) in self.puzzles.iter().enumerate() {
            let n = idx + 1;
            let word = puzzle.word.as_str();
            violations.check(word.chars().all(|c| c.is_ascii_uppercase()), || {
                format!("puzzles[{n}].word {word:?} must contain only uppercase letters")
            });
            violations.check((MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len()), || {
                format!(
                    "puzzles[{n}].word {word:?} must be {MIN_WORD_LEN} to {MAX_WORD_LEN} letters long"
                )
            });
            violations.check(seen.insert(word), || {
                format!("puzzles[{n}].word {word:?} is repeated")
            });
            violations.require_text(&format!("puzzles[{n}].hint"), &puzzle.hint);
            violations.require_text(&format!("puzzles[{n}].explanation"), &puzzle.explanation);
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WordPuzzlesInput {
    pub theme: String,
    pub count: u32,
}

impl FlowInput for WordPuzzlesInput {
    fn validate(&self) -> Result<(), EcoActionError> {
        require_text("theme", &self.theme)?;
        require_range("count", self.count, 1, MAX_PUZZLES)
    }

    fn variables(&self) -> HashMap<String, Value> {
        vars([
            ("theme", Value::from(self.theme.trim())),
            ("count", Value::from(self.count)),
        ])
    }
}

const TEMPLATE: &str = r#"You are a creative game master. Generate {{count}} different words for a word scramble puzzle based on the theme of {{theme}}.

Each word must be between 6 and 10 letters long, contain letters only, and be in uppercase. Do not repeat words.

For each word, provide:
- word: the uppercase word
- hint: a short hint or clue for the word
- explanation: one or two sentences on how the word relates to protecting the environment"#;

fn puzzles_match_requested_count(
    input: &WordPuzzlesInput,
    output: &WordPuzzles,
    violations: &mut Violations,
) {
    violations.check(output.puzzles.len() == input.count as usize, || {
        format!(
            "{} puzzles returned, {} were requested",
            output.puzzles.len(),
            input.count
        )
    });
}

pub fn flow() -> StructuredFlow<WordPuzzlesInput, WordPuzzles> {
    StructuredFlow::new("generate_word_puzzles", TEMPLATE).with_check(puzzles_match_requested_count)
}

pub async fn generate_word_puzzles(
    client: &CompletionClient,
    input: &WordPuzzlesInput,
) -> Result<WordPuzzles, EcoActionError> {
    flow().run(client, input).await
}
