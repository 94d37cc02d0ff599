// Config loading tests - modelscan.toml from disk with environment overrides

use modelscan_core::{AppConfig, ConfigError};
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

const OVERRIDES: [&str; 5] = [
    "MODELS_JSON",
    "AWS_BEDROCK_REGION",
    "AWS_JUMPSTART_REGION",
    "JUMPSTART_EXEC_ROLE_ARN",
    "JUMPSTART_INSTANCE",
];

fn clear_overrides() {
    for key in OVERRIDES {
        unsafe { env::remove_var(key) };
    }
}

#[test]
#[serial]
fn explicit_file_is_loaded() {
    clear_overrides();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("modelscan.toml");
    fs::write(
        &path,
        r#"
models_file = "data/custom.json"
queries = ["Summarise Rust ownership in one line."]
pacing_ms = 100
temperature = 0.2
request_timeout_secs = 30

[openai]
endpoint = "http://localhost:8080"
api_key_env = "LOCAL_OPENAI_KEY"

[jumpstart]
exec_role_arn = "arn:aws:iam::123456789012:role/sagemaker"
default_instance = "ml.g5.12xlarge"
"#,
    )
    .expect("write config");

    let config = AppConfig::load(Some(&path)).expect("load config");
    assert_eq!(config.models_file, PathBuf::from("data/custom.json"));
    assert_eq!(config.queries.len(), 1);
    assert_eq!(config.pacing, Duration::from_millis(100));
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(config.generation.max_tokens, 128);
    assert_eq!(config.request_timeout, Duration::from_secs(30));
    assert_eq!(config.openai.endpoint, "http://localhost:8080");
    assert_eq!(config.openai.api_key_env, "LOCAL_OPENAI_KEY");
    assert_eq!(config.together.api_key_env, "TOGETHER_API_KEY");
    assert_eq!(config.bedrock.region, "us-east-1");
    assert_eq!(config.jumpstart.region, "us-east-2");
    assert_eq!(config.jumpstart.default_instance, "ml.g5.12xlarge");
}

#[test]
#[serial]
fn environment_overrides_file_values() {
    clear_overrides();
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("modelscan.toml");
    fs::write(
        &path,
        r#"
models_file = "from-file.json"

[jumpstart]
region = "eu-west-1"
"#,
    )
    .expect("write config");

    unsafe {
        env::set_var("MODELS_JSON", "from-env.json");
        env::set_var("AWS_JUMPSTART_REGION", "us-west-2");
    }
    let config = AppConfig::load(Some(&path));
    clear_overrides();

    let config = config.expect("load config");
    assert_eq!(config.models_file, PathBuf::from("from-env.json"));
    assert_eq!(config.jumpstart.region, "us-west-2");
}

#[test]
#[serial]
fn missing_explicit_file_is_an_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("absent.toml");
    let result = AppConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::NotFound { .. })));
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("modelscan.toml");

    fs::write(&path, "queries = []").expect("write config");
    assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::NoQueries)));

    fs::write(&path, "temperature = 3.5").expect("write config");
    assert!(matches!(
        AppConfig::load(Some(&path)),
        Err(ConfigError::InvalidValue { field: "temperature", .. })
    ));

    fs::write(&path, "pacing_ms = \"fast\"").expect("write config");
    assert!(matches!(AppConfig::load(Some(&path)), Err(ConfigError::Parse { .. })));
}

#[test]
fn inline_toml_ignores_environment() {
    let config = AppConfig::from_toml_str("[bedrock]\nregion = \"ap-southeast-2\"").expect("parse");
    assert_eq!(config.bedrock.region, "ap-southeast-2");
    assert_eq!(config.queries, AppConfig::default().queries);
}
