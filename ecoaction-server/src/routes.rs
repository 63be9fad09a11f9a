//! JSON handlers, one per flow.
//!
//! Request bodies are read into all-optional structs so a missing field gets
//! the route's own message instead of a generic deserialization error.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::{Local, NaiveDate};
use ecoaction_flows::{
    analyze_carbon_footprint, carbon_emission_suggestions, default_language, evaluate_eco_story,
    generate_carbon_quiz, generate_eco_situation, generate_eco_story, generate_word_puzzles,
    CarbonAnalysis, CarbonFootprintInput, CarbonQuiz, CarbonQuizInput, CarbonSuggestions,
    CarbonSuggestionsInput, EcoSituation, EcoSituationInput, EcoStory, EcoStoryInput,
    EvaluateStoryInput, StoryEvaluation, WordPuzzles, WordPuzzlesInput,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{ApiError, AppState};

type Body<T> = Result<Json<T>, JsonRejection>;

fn body<T>(body: Body<T>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(ApiError::from_rejection)
}

fn required(value: Option<String>, message: &str) -> Result<String, ApiError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ApiError::bad_request(message)),
    }
}

/// Blank or absent means English.
fn language(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(default_language)
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeCarbonRequest {
    pub activities: Option<String>,
    pub language: Option<String>,
    /// `YYYY-MM-DD`; today when absent.
    pub date: Option<String>,
}

fn analysis_date(value: Option<&str>) -> Result<NaiveDate, ApiError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::bad_request("Date must be formatted as YYYY-MM-DD")),
        None => Ok(Local::now().date_naive()),
    }
}

pub async fn analyze_carbon(
    State(state): State<AppState>,
    request: Body<AnalyzeCarbonRequest>,
) -> Result<Json<CarbonAnalysis>, ApiError> {
    let request = body(request)?;
    let input = CarbonFootprintInput {
        activities: required(request.activities, "Activities are required")?,
        language: language(request.language),
        date: analysis_date(request.date.as_deref())?,
    };

    analyze_carbon_footprint(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| {
            ApiError::from_flow("analyze-carbon", "Failed to analyze carbon footprint", err)
        })
}

#[derive(Debug, Default, Deserialize)]
pub struct CarbonSuggestionsRequest {
    pub lifestyle: Option<String>,
    pub habits: Option<String>,
    pub language: Option<String>,
}

pub async fn carbon_suggestions(
    State(state): State<AppState>,
    request: Body<CarbonSuggestionsRequest>,
) -> Result<Json<CarbonSuggestions>, ApiError> {
    let request = body(request)?;
    let input = CarbonSuggestionsInput {
        lifestyle: required(request.lifestyle, "Lifestyle information is required")?,
        habits: request.habits.unwrap_or_default(),
        language: language(request.language),
    };

    carbon_emission_suggestions(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| {
            ApiError::from_flow(
                "carbon-suggestions",
                "Failed to generate carbon emission suggestions",
                err,
            )
        })
}

#[derive(Debug, Default, Deserialize)]
pub struct CarbonQuizRequest {
    pub count: Option<u32>,
    pub language: Option<String>,
}

pub async fn carbon_quiz(
    State(state): State<AppState>,
    request: Body<CarbonQuizRequest>,
) -> Result<Json<CarbonQuiz>, ApiError> {
    let request = body(request)?;
    let input = CarbonQuizInput {
        count: request
            .count
            .ok_or_else(|| ApiError::bad_request("Question count is required"))?,
        language: language(request.language),
    };

    generate_carbon_quiz(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_flow("carbon-quiz", "Failed to generate carbon quiz", err))
}

#[derive(Debug, Default, Deserialize)]
pub struct ThemeRequest {
    pub theme: Option<String>,
}

pub async fn eco_situation(
    State(state): State<AppState>,
    request: Body<ThemeRequest>,
) -> Result<Json<EcoSituation>, ApiError> {
    let request = body(request)?;
    let input = EcoSituationInput {
        theme: required(request.theme, "Theme is required")?,
    };

    generate_eco_situation(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| {
            ApiError::from_flow("eco-situation", "Failed to generate eco situation", err)
        })
}

#[derive(Debug, Default, Deserialize)]
pub struct WordPuzzlesRequest {
    pub theme: Option<String>,
    pub count: Option<u32>,
}

pub async fn word_puzzles(
    State(state): State<AppState>,
    request: Body<WordPuzzlesRequest>,
) -> Result<Json<WordPuzzles>, ApiError> {
    let request = body(request)?;
    let input = WordPuzzlesInput {
        theme: required(request.theme, "Theme is required")?,
        count: request
            .count
            .ok_or_else(|| ApiError::bad_request("Puzzle count is required"))?,
    };

    generate_word_puzzles(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_flow("word-puzzles", "Failed to generate word puzzles", err))
}

pub async fn eco_story(
    State(state): State<AppState>,
    request: Body<ThemeRequest>,
) -> Result<Json<EcoStory>, ApiError> {
    let request = body(request)?;
    let input = EcoStoryInput {
        theme: required(request.theme, "Theme is required")?,
    };

    generate_eco_story(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| ApiError::from_flow("eco-story", "Failed to generate eco story", err))
}

#[derive(Debug, Default, Deserialize)]
pub struct EvaluateStoryRequest {
    pub story: Option<String>,
}

pub async fn evaluate_story(
    State(state): State<AppState>,
    request: Body<EvaluateStoryRequest>,
) -> Result<Json<StoryEvaluation>, ApiError> {
    let request = body(request)?;
    let input = EvaluateStoryInput {
        story: required(request.story, "Story is required")?,
    };

    evaluate_eco_story(state.client(), &input)
        .await
        .map(Json)
        .map_err(|err| {
            ApiError::from_flow("eco-story/evaluate", "Failed to evaluate eco story", err)
        })
}
