// Requested models file tests

use modelscan_core::requested::{RequestedError, load_requested};
use std::fs;
use tempfile::tempdir;

#[test]
fn wrapped_document_keeps_file_order() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("top_10_models.json");
    fs::write(
        &path,
        r#"{"models": ["GPT 4o", "Claude 3.5 Sonnet", "Llama 3.1 70B Instruct"]}"#,
    )
    .expect("write models");

    let models = load_requested(&path).expect("load");
    assert_eq!(models, vec!["GPT 4o", "Claude 3.5 Sonnet", "Llama 3.1 70B Instruct"]);
}

#[test]
fn bare_list_is_accepted() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("models.json");
    fs::write(&path, r#"["Gemini 1.5 Pro"]"#).expect("write models");
    assert_eq!(load_requested(&path).expect("load"), vec!["Gemini 1.5 Pro"]);
}

#[test]
fn malformed_document_fails_fast() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("models.json");
    fs::write(&path, r#"{"models": "GPT 4o"}"#).expect("write models");
    assert!(matches!(load_requested(&path), Err(RequestedError::Parse { .. })));
}

#[test]
fn missing_file_is_reported() {
    let dir = tempdir().expect("tempdir");
    let err = load_requested(&dir.path().join("nope.json")).expect_err("missing");
    assert!(matches!(err, RequestedError::NotFound { .. }));
    assert!(err.to_string().contains("nope.json"));
}
