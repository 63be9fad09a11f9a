use std::sync::{Arc, Mutex};

use ecoaction_core::{ChatModel, CompletionClient, EcoActionError, LlmRequest, LlmResponse};
use ecoaction_flows::{
    evaluate_eco_story, generate_carbon_quiz, generate_eco_situation, generate_eco_story,
    generate_word_puzzles, CarbonQuizInput, EcoSituationInput, EcoStoryInput, EvaluateStoryInput,
    WordPuzzlesInput,
};
use serde_json::json;

#[derive(Clone)]
struct CannedModel {
    content: String,
    calls: Arc<Mutex<usize>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl CannedModel {
    fn json(value: serde_json::Value) -> Self {
        Self::text(&value.to_string())
    }

    fn text(content: &str) -> Self {
        Self {
            content: content.to_string(),
            calls: Arc::new(Mutex::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn last_prompt(&self) -> String {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ChatModel for CannedModel {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, EcoActionError> {
        *self.calls.lock().unwrap() += 1;
        if let Some(message) = request.messages.last() {
            self.prompts.lock().unwrap().push(message.content.clone());
        }
        Ok(LlmResponse {
            content: self.content.clone(),
            ..Default::default()
        })
    }
}

fn option(text: &str, correct: bool) -> serde_json::Value {
    json!({
        "text": text,
        "isCorrect": correct,
        "feedback": if correct { "Correct! You earned 10 eco-points!" } else { "Not quite." },
    })
}

fn question(text: &str) -> serde_json::Value {
    json!({
        "question": text,
        "options": [
            option("Take the bus", true),
            option("Drive alone", false),
            option("Idle the engine", false),
            option("Fly short-haul", false),
        ],
    })
}

fn quiz_input(count: u32) -> CarbonQuizInput {
    CarbonQuizInput {
        count,
        language: "English".to_string(),
    }
}

fn violations_of(err: EcoActionError) -> (String, Vec<String>) {
    match err {
        EcoActionError::Validation { target, violations } => (target, violations),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn quiz_with_requested_questions_is_returned() {
    let model = CannedModel::json(json!({
        "questions": [question("Lowest-carbon commute?"), question("Best way to travel 3km?")]
    }));
    let client = CompletionClient::from_model(model.clone());

    let quiz = generate_carbon_quiz(&client, &quiz_input(2)).await.unwrap();

    assert_eq!(quiz.questions.len(), 2);
    assert_eq!(quiz.questions[0].options.len(), 4);
    assert!(quiz.questions[0].options[0].is_correct);
    assert!(model.last_prompt().contains("Generate a list of 2 quiz questions in English"));
}

#[tokio::test]
async fn quiz_with_three_options_fails_validation() {
    let mut short = question("Lowest-carbon commute?");
    short["options"].as_array_mut().unwrap().pop();
    let client = CompletionClient::from_model(CannedModel::json(json!({ "questions": [short] })));

    let err = generate_carbon_quiz(&client, &quiz_input(1)).await.unwrap_err();

    let (target, violations) = violations_of(err);
    assert_eq!(target, "carbon_quiz");
    assert_eq!(violations, vec!["question 1 has 3 options, expected 4".to_string()]);
}

#[tokio::test]
async fn quiz_with_two_correct_answers_fails_validation() {
    let mut doubled = question("Lowest-carbon commute?");
    doubled["options"][1]["isCorrect"] = json!(true);
    let client = CompletionClient::from_model(CannedModel::json(json!({ "questions": [doubled] })));

    let err = generate_carbon_quiz(&client, &quiz_input(1)).await.unwrap_err();

    let (_, violations) = violations_of(err);
    assert_eq!(
        violations,
        vec!["question 1 has 2 correct options, expected exactly 1".to_string()]
    );
}

#[tokio::test]
async fn quiz_with_wrong_question_count_fails_validation() {
    let client = CompletionClient::from_model(CannedModel::json(json!({
        "questions": [question("Lowest-carbon commute?")]
    })));

    let err = generate_carbon_quiz(&client, &quiz_input(3)).await.unwrap_err();

    let (target, violations) = violations_of(err);
    assert_eq!(target, "carbon_quiz");
    assert_eq!(violations, vec!["quiz has 1 questions, 3 were requested".to_string()]);
}

#[tokio::test]
async fn quiz_count_out_of_range_is_rejected_without_a_call() {
    let model = CannedModel::json(json!({ "questions": [] }));
    let client = CompletionClient::from_model(model.clone());

    for count in [0, 21] {
        let err = generate_carbon_quiz(&client, &quiz_input(count)).await.unwrap_err();
        assert!(matches!(err, EcoActionError::InvalidInput(ref m) if m.starts_with("count must be between 1 and 20")));
    }
    assert_eq!(model.calls(), 0);
}

#[tokio::test]
async fn situation_with_three_options_is_returned() {
    let model = CannedModel::json(json!({
        "title": "The Grocery Run",
        "description": "You need milk from a shop 1km away.",
        "options": [
            option("Walk with a reusable bag", true),
            option("Drive", false),
            option("Order a single-item delivery", false),
        ],
    }));
    let client = CompletionClient::from_model(model.clone());
    let input = EcoSituationInput {
        theme: "shopping".to_string(),
    };

    let situation = generate_eco_situation(&client, &input).await.unwrap();

    assert_eq!(situation.title, "The Grocery Run");
    assert_eq!(situation.options.iter().filter(|o| o.is_correct).count(), 1);
    assert!(model.last_prompt().contains("based on the theme of shopping"));
}

#[tokio::test]
async fn situation_with_four_options_fails_validation() {
    let client = CompletionClient::from_model(CannedModel::json(json!({
        "title": "The Grocery Run",
        "description": "You need milk from a shop 1km away.",
        "options": [
            option("Walk", true),
            option("Drive", false),
            option("Taxi", false),
            option("Scooter", false),
        ],
    })));
    let input = EcoSituationInput {
        theme: "shopping".to_string(),
    };

    let err = generate_eco_situation(&client, &input).await.unwrap_err();

    let (target, violations) = violations_of(err);
    assert_eq!(target, "eco_situation");
    assert_eq!(violations, vec!["situation has 4 options, expected 3".to_string()]);
}

fn puzzle(word: &str) -> serde_json::Value {
    json!({
        "word": word,
        "hint": "Turning waste into new things",
        "explanation": "Keeps materials out of landfill.",
    })
}

#[tokio::test]
async fn word_puzzles_are_returned() {
    let client = CompletionClient::from_model(CannedModel::json(json!({
        "puzzles": [puzzle("RECYCLE"), puzzle("COMPOST")]
    })));
    let input = WordPuzzlesInput {
        theme: "waste".to_string(),
        count: 2,
    };

    let puzzles = generate_word_puzzles(&client, &input).await.unwrap();

    let words: Vec<_> = puzzles.puzzles.iter().map(|p| p.word.as_str()).collect();
    assert_eq!(words, ["RECYCLE", "COMPOST"]);
}

#[tokio::test]
async fn lowercase_puzzle_word_fails_validation() {
    let client = CompletionClient::from_model(CannedModel::json(json!({
        "puzzles": [puzzle("recycle")]
    })));
    let input = WordPuzzlesInput {
        theme: "waste".to_string(),
        count: 1,
    };

    let err = generate_word_puzzles(&client, &input).await.unwrap_err();

    let (target, violations) = violations_of(err);
    assert_eq!(target, "word_puzzles");
    assert_eq!(violations.len(), 1);
    assert!(violations[0].contains("uppercase"));
}

#[tokio::test]
async fn short_and_repeated_words_are_all_reported() {
    let client = CompletionClient::from_model(CannedModel::json(json!({
        "puzzles": [puzzle("TREE"), puzzle("SOLAR"), puzzle("SOLAR")]
    })));
    let input = WordPuzzlesInput {
        theme: "nature".to_string(),
        count: 3,
    };

    let err = generate_word_puzzles(&client, &input).await.unwrap_err();

    let (_, violations) = violations_of(err);
    assert_eq!(violations.len(), 4);
    assert!(violations.iter().any(|v| v.contains("is repeated")));
}

fn story(template: &str, blanks: usize) -> serde_json::Value {
    let correct: Vec<String> = (1..=blanks).map(|i| format!("right{i}")).collect();
    let incorrect: Vec<String> = (1..=blanks).map(|i| format!("wrong{i}")).collect();
    json!({
        "title": "The River Clean-up",
        "storyTemplate": template,
        "correctWords": correct,
        "incorrectWords": incorrect,
    })
}

const FOUR_BLANKS: &str =
    "Mia saw [1] in the river. She called her [2], grabbed a [3], and by noon the water was [4].";

#[tokio::test]
async fn story_with_matching_blanks_is_returned() {
    let client = CompletionClient::from_model(CannedModel::json(story(FOUR_BLANKS, 4)));
    let input = EcoStoryInput {
        theme: "water conservation".to_string(),
    };

    let story = generate_eco_story(&client, &input).await.unwrap();

    assert_eq!(story.correct_words.len(), 4);
    assert_eq!(
        story.placeholders().unwrap().into_iter().collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
}

#[tokio::test]
async fn story_with_mismatched_word_lists_fails_validation() {
    let mut body = story(FOUR_BLANKS, 4);
    body["incorrectWords"].as_array_mut().unwrap().pop();
    let client = CompletionClient::from_model(CannedModel::json(body));
    let input = EcoStoryInput {
        theme: "water conservation".to_string(),
    };

    let err = generate_eco_story(&client, &input).await.unwrap_err();

    let (target, violations) = violations_of(err);
    assert_eq!(target, "eco_story");
    assert_eq!(
        violations,
        vec!["story has 4 blanks but 3 incorrect words".to_string()]
    );
}

#[tokio::test]
async fn story_with_too_few_or_gapped_blanks_fails_validation() {
    let client = CompletionClient::from_model(CannedModel::json(story(
        "Plant a [1] and water it every [3].",
        2,
    )));
    let input = EcoStoryInput {
        theme: "forestation".to_string(),
    };

    let err = generate_eco_story(&client, &input).await.unwrap_err();

    let (_, violations) = violations_of(err);
    assert!(violations.iter().any(|v| v.contains("expected 4 to 6")));
    assert!(violations.iter().any(|v| v.contains("must be numbered [1]..[2]")));
}

#[tokio::test]
async fn story_evaluation_is_returned() {
    let model = CannedModel::json(json!({
        "evaluation": "Great choices! Cleaning the river protects its wildlife."
    }));
    let client = CompletionClient::from_model(model.clone());
    let input = EvaluateStoryInput {
        story: "Mia saw plastic in the river.".to_string(),
    };

    let result = evaluate_eco_story(&client, &input).await.unwrap();

    assert!(result.evaluation.starts_with("Great choices!"));
    assert!(model.last_prompt().contains("\"Mia saw plastic in the river.\""));
}

#[tokio::test]
async fn blank_story_evaluation_fails_validation() {
    let client = CompletionClient::from_model(CannedModel::json(json!({ "evaluation": "  " })));
    let input = EvaluateStoryInput {
        story: "Mia saw plastic in the river.".to_string(),
    };

    let err = evaluate_eco_story(&client, &input).await.unwrap_err();

    assert_eq!(
        violations_of(err).1,
        vec!["evaluation must not be empty".to_string()]
    );
}

#[tokio::test]
async fn malformed_output_fails_instead_of_returning_partial_data() {
    let client = CompletionClient::from_model(CannedModel::text("Sure! Here is your story: ..."));
    let input = EcoStoryInput {
        theme: "recycling".to_string(),
    };

    let err = generate_eco_story(&client, &input).await.unwrap_err();

    assert!(matches!(err, EcoActionError::ParseFailed { .. }));
}

#[tokio::test]
async fn fenced_json_output_is_accepted() {
    let fenced = format!(
        "```json\n{}\n```",
        json!({ "evaluation": "Well done." })
    );
    let client = CompletionClient::from_model(CannedModel::text(&fenced));
    let input = EvaluateStoryInput {
        story: "Mia recycled.".to_string(),
    };

    let result = evaluate_eco_story(&client, &input).await.unwrap();

    assert_eq!(result.evaluation, "Well done.");
}

#[test]
fn placeholders_are_distinct_and_read_multi_digit_markers() {
    let story = ecoaction_flows::EcoStory {
        title: "Blanks".to_string(),
        story_template: "[2] then [1], again [1], and finally [12]. Not a blank: [x]".to_string(),
        correct_words: Vec::new(),
        incorrect_words: Vec::new(),
    };

    let blanks = story.placeholders().unwrap();

    assert_eq!(blanks.into_iter().collect::<Vec<_>>(), vec![1, 2, 12]);
}
