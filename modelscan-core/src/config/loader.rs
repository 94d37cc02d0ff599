use super::AppConfig;
use super::app::GenerationSettings;
use super::error::ConfigError;
use super::provider::{
    BedrockConfig, HttpProviderConfig, JumpStartConfig, RawBedrock, RawHttpProvider,
    RawJumpStart,
};
use crate::constants::{CONFIG_PATH, ENV_PATH, MODELS_FILE_ENV};
use dotenvy::from_filename;
use serde::Deserialize;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;
use tracing::debug;

static ENV_LOADER: Once = Once::new();

/// Raw configuration structure for deserialization from TOML
#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    models_file: Option<String>,
    queries: Option<Vec<String>>,
    pacing_ms: Option<u64>,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    request_timeout_secs: Option<u64>,
    openai: Option<RawHttpProvider>,
    together: Option<RawHttpProvider>,
    gemini: Option<RawHttpProvider>,
    #[serde(default)]
    bedrock: RawBedrock,
    #[serde(default)]
    jumpstart: RawJumpStart,
}

/// Ensures environment variables are loaded from config/.env
pub fn ensure_env_loaded() {
    ENV_LOADER.call_once(|| {
        let _ = from_filename(ENV_PATH);
    });
}

/// Load and validate configuration.
///
/// An explicit path must exist. Without one, the default path is used when
/// present and built-in defaults otherwise. Environment variables override
/// file values in both cases.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    ensure_env_loaded();
    let lookup = |key: &str| env::var(key).ok().filter(|value| !value.trim().is_empty());

    match path {
        Some(path) => read_config(path, lookup),
        None => {
            let default_path = Path::new(CONFIG_PATH);
            if default_path.exists() {
                read_config(default_path, lookup)
            } else {
                debug!(path = CONFIG_PATH, "No configuration file, using defaults");
                build(RawConfig::default(), lookup)
            }
        }
    }
}

fn read_config<F>(path: &Path, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    debug!(path = %path.display(), "Reading modelscan configuration file");

    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    parse_config(&content, path, lookup)
}

pub(super) fn parse_config<F>(
    content: &str,
    path: &Path,
    lookup: F,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let parsed: RawConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    build(parsed, lookup)
}

fn build<F>(mut raw: RawConfig, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut raw, &lookup);
    validate_and_build(raw)
}

/// Environment variables recognised on top of the file.
fn apply_env_overrides<F>(raw: &mut RawConfig, lookup: &F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup(MODELS_FILE_ENV) {
        raw.models_file = Some(path);
    }
    if let Some(region) = lookup("AWS_BEDROCK_REGION") {
        raw.bedrock.region = Some(region);
    }
    if let Some(region) = lookup("AWS_JUMPSTART_REGION") {
        raw.jumpstart.region = Some(region);
    }
    if let Some(arn) = lookup("JUMPSTART_EXEC_ROLE_ARN") {
        raw.jumpstart.exec_role_arn = Some(arn);
    }
    if let Some(instance) = lookup("JUMPSTART_INSTANCE") {
        raw.jumpstart.default_instance = Some(instance);
    }
}

fn validate_and_build(raw: RawConfig) -> Result<AppConfig, ConfigError> {
    let defaults = AppConfig::default();

    let queries = match raw.queries {
        Some(queries) => {
            let queries: Vec<String> = queries
                .into_iter()
                .map(|query| query.trim().to_string())
                .filter(|query| !query.is_empty())
                .collect();
            if queries.is_empty() {
                return Err(ConfigError::NoQueries);
            }
            queries
        }
        None => defaults.queries,
    };

    let max_tokens = raw.max_tokens.unwrap_or(defaults.generation.max_tokens);
    if max_tokens == 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_tokens",
            reason: "must be greater than zero".to_string(),
        });
    }
    let temperature = raw.temperature.unwrap_or(defaults.generation.temperature);
    if !(0.0..=2.0).contains(&temperature) {
        return Err(ConfigError::InvalidValue {
            field: "temperature",
            reason: format!("{temperature} is outside 0.0..=2.0"),
        });
    }

    let models_file = raw
        .models_file
        .map(|path| PathBuf::from(shellexpand::tilde(&path).into_owned()))
        .unwrap_or(defaults.models_file);

    Ok(AppConfig {
        models_file,
        queries,
        pacing: raw
            .pacing_ms
            .map(Duration::from_millis)
            .unwrap_or(defaults.pacing),
        generation: GenerationSettings {
            max_tokens,
            temperature,
        },
        request_timeout: raw
            .request_timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout),
        openai: HttpProviderConfig::openai().merged(raw.openai),
        together: HttpProviderConfig::together().merged(raw.together),
        gemini: HttpProviderConfig::gemini().merged(raw.gemini),
        bedrock: BedrockConfig::from(raw.bedrock),
        jumpstart: JumpStartConfig::from(raw.jumpstart),
    })
}
