use std::collections::HashMap;

use ecoaction_core::{EcoActionError, Value};
use ecoaction_prompt::PromptTemplate;

#[test]
fn renders_template_with_vars() {
    let tmpl = PromptTemplate::new("Generate a scenario based on the theme of {{theme}}.");
    let mut vars = HashMap::new();
    vars.insert("theme".to_string(), Value::from("water conservation"));
    let rendered = tmpl.render(&vars).expect("render");
    assert_eq!(
        rendered,
        "Generate a scenario based on the theme of water conservation."
    );
}

#[test]
fn does_not_confuse_overlapping_keys() {
    let tmpl = PromptTemplate::new("{{lang}} {{language}}");
    let mut vars = HashMap::new();
    vars.insert("lang".to_string(), Value::from("X"));
    vars.insert("language".to_string(), Value::from("Y"));
    let rendered = tmpl.render(&vars).expect("render");
    assert_eq!(rendered, "X Y");
}

#[test]
fn renders_numbers_without_quotes() {
    let tmpl = PromptTemplate::new("Generate {{ count }} questions.");
    let mut vars = HashMap::new();
    vars.insert("count".to_string(), Value::from(10));
    assert_eq!(tmpl.render(&vars).unwrap(), "Generate 10 questions.");
}

#[test]
fn lists_variables_once_in_order() {
    let tmpl = PromptTemplate::new("{{theme}} then {{count}} then {{theme}}");
    assert_eq!(tmpl.variables().unwrap(), vec!["theme", "count"]);
}

#[test]
fn missing_variable_is_an_error() {
    let tmpl = PromptTemplate::new("Lifestyle: {{lifestyle}}\nHabits: {{habits}}");
    let mut vars = HashMap::new();
    vars.insert("lifestyle".to_string(), Value::from("city flat"));
    let err = tmpl.render(&vars).unwrap_err();
    match err {
        EcoActionError::InvalidConfig(message) => assert!(message.contains("habits")),
        other => panic!("unexpected error: {other:?}"),
    }
}
