//! Structured-completion flows behind the EcoAction games and carbon tools.
//!
//! Each flow renders a prompt from typed input, asks the model for JSON
//! matching the output type's schema, and validates the result.

pub mod carbon;
mod flow;
pub mod puzzle;
pub mod quiz;
pub mod story;
pub mod suggestions;

pub use carbon::{
    analyze_carbon_footprint, ActivityCategory, AnalyzedActivity, CarbonAnalysis,
    CarbonFootprintInput, CarbonScore, ImpactType,
};
pub use flow::{default_language, FlowInput, InputCheck, StructuredFlow};
pub use puzzle::{generate_word_puzzles, WordPuzzle, WordPuzzles, WordPuzzlesInput};
pub use quiz::{
    generate_carbon_quiz, generate_eco_situation, CarbonQuiz, CarbonQuizInput, ChoiceOption,
    EcoSituation, EcoSituationInput, QuizQuestion,
};
pub use story::{
    evaluate_eco_story, generate_eco_story, EcoStory, EcoStoryInput, EvaluateStoryInput,
    StoryEvaluation,
};
pub use suggestions::{
    carbon_emission_suggestions, CarbonSuggestion, CarbonSuggestions, CarbonSuggestionsInput,
    Difficulty, ImpactLevel,
};
