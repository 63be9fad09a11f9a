use ecoaction_core::{EcoActionError, Violations};

#[test]
fn validation_error_lists_every_violation() {
    let mut violations = Violations::new();
    violations.push("question 1 has 3 options, expected 4");
    violations.require_text("summary", "  ");
    let err = violations.into_result("carbon_quiz").unwrap_err();

    assert_eq!(
        err.to_string(),
        "carbon_quiz failed validation: question 1 has 3 options, expected 4; summary must not be empty"
    );
    assert_eq!(err.kind(), "validation");
}

#[test]
fn empty_violations_are_ok() {
    let mut violations = Violations::new();
    violations.require_finite("netImpact", -3.5);
    violations.check(true, || "unreachable".to_string());
    assert!(violations.is_empty());
    assert!(violations.into_result("carbon_analysis").is_ok());
}

#[test]
fn api_error_includes_status_and_message() {
    let err = EcoActionError::Api {
        status: 401,
        message: "Access denied due to invalid subscription key".to_string(),
    };
    let text = err.to_string();
    assert!(text.contains("401"));
    assert!(text.contains("invalid subscription key"));
    assert!(!err.is_client_error());
}

#[test]
fn serde_errors_convert() {
    let err: EcoActionError = serde_json::from_str::<serde_json::Value>("{")
        .unwrap_err()
        .into();
    assert_eq!(err.kind(), "serde");
}
