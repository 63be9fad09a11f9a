use serde_json::{json, Value};
use ecoaction_core::{EcoActionError, JsonOutputParser, LlmResponse};

#[test]
fn test_json_output_parser() {
    let parser = JsonOutputParser::<Value>::new();

    let output = parser.parse(r#"{"key": "value"}"#).unwrap();
    assert_eq!(output, json!({"key": "value"}));

    let markdown_json = r#"```json
{
    "key": "value"
}
```"#;
    let output = parser.parse(markdown_json).unwrap();
    assert_eq!(output, json!({"key": "value"}));

    let response = LlmResponse {
        content: markdown_json.to_string(),
        ..Default::default()
    };
    let output = parser.parse_response(&response).unwrap();
    assert_eq!(output, json!({"key": "value"}));
}

#[test]
fn test_json_output_parser_typed() {
    #[derive(serde::Deserialize, PartialEq, Debug)]
    struct MyStruct {
        foo: String,
        bar: i32,
    }

    let parser = JsonOutputParser::<MyStruct>::new();
    let output = parser.parse(r#"{"foo": "baz", "bar": 42}"#).unwrap();

    assert_eq!(
        output,
        MyStruct {
            foo: "baz".to_string(),
            bar: 42
        }
    );
}

#[test]
fn non_json_text_is_a_parse_failure() {
    let parser = JsonOutputParser::<Value>::new();
    let err = parser.parse("Sure! Here is your quiz:").unwrap_err();
    match err {
        EcoActionError::ParseFailed { output, reason } => {
            assert_eq!(output, "Sure! Here is your quiz:");
            assert!(reason.starts_with("not valid JSON"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn wrong_shape_is_reported_as_shape_mismatch() {
    #[derive(serde::Deserialize, Debug)]
    #[allow(dead_code)]
    struct Word {
        word: String,
    }

    let parser = JsonOutputParser::<Word>::new();
    let err = parser.parse(r#"{"word": 7}"#).unwrap_err();
    match err {
        EcoActionError::ParseFailed { reason, .. } => {
            assert!(reason.contains("expected shape"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
