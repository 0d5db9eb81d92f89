use std::io::Write;
use std::process::{Command, Output, Stdio};

fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_event_forecast_rust"))
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("FORECAST_MODE")
        .env_remove("FORECAST_INPUT")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(stdin.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_json(out: &Output) -> serde_json::Value {
    let text = String::from_utf8(out.stdout.clone()).unwrap();
    assert_eq!(text.trim().lines().count(), 1, "expected one JSON document: {text}");
    serde_json::from_str(text.trim()).unwrap()
}

#[test]
fn missing_prices_yield_error_document() {
    let out = run_cli(&[], r#"{"events": []}"#);
    assert!(!out.status.success());
    assert_eq!(stdout_json(&out), serde_json::json!({"error": "No prices provided"}));

    let out = run_cli(&[], r#"{"prices": []}"#);
    assert!(!out.status.success());
    assert_eq!(stdout_json(&out)["error"], "No prices provided");
}

#[test]
fn malformed_input_is_a_single_error_document() {
    let out = run_cli(&[], "not json");
    assert!(!out.status.success());
    let doc = stdout_json(&out);
    assert_eq!(doc.as_object().unwrap().len(), 1);
    assert!(doc["error"].is_string());
}

#[test]
fn plain_forecast_has_bands_of_requested_length() {
    let out = run_cli(&["--days", "5", "--seed", "11"], r#"{"prices": [100, 101, 99, 102, 103]}"#);
    assert!(out.status.success());
    let doc = stdout_json(&out);
    for key in ["median", "low_10", "high_90", "low_25", "high_75"] {
        assert_eq!(doc[key].as_array().unwrap().len(), 5, "{key}");
    }
    assert_eq!(doc["samples"].as_array().unwrap().len(), 20);
    assert_eq!(doc["last_price"], 103.0);
    assert_eq!(doc["prediction_length"], 5);
    assert!(doc.get("event_context").is_none());
    assert!(doc.get("event_analysis").is_none());
}

#[test]
fn event_modes_attach_their_field() {
    let input = r#"{"prices": [10, 11, 12],
        "events": [{"classification": "surprising_positive", "strength": 4, "residual_return": 0.02}],
        "event": {"classification": "surprising_negative", "strength": 15}}"#;

    let out = run_cli(&["--mode", "with_events", "--days", "2"], input);
    assert!(out.status.success());
    let doc = stdout_json(&out);
    assert_eq!(doc["event_context"]["num_events"], 1);
    assert_eq!(doc["event_context"]["event_bias"], 1.0);

    let out = run_cli(&["--mode", "with_events", "--days", "2"], r#"{"prices": [10, 11]}"#);
    let doc = stdout_json(&out);
    assert!(doc["event_context"].is_null());

    let out = run_cli(&["--mode", "post_event", "--days", "2", "--model", "weird"], input);
    assert!(out.status.success());
    let doc = stdout_json(&out);
    assert_eq!(doc["event_analysis"]["expected_continuation"], -0.2);
    assert_eq!(doc["event_analysis"]["confidence"], 1.0);
    assert!(doc.get("event_context").is_none());
}
