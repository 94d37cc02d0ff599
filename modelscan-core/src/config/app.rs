use super::error::ConfigError;
use super::provider::{BedrockConfig, HttpProviderConfig, JumpStartConfig};
use crate::constants::{
    DEFAULT_MAX_TOKENS, DEFAULT_MODELS_FILE, DEFAULT_PACING_MS, DEFAULT_QUERY,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TEMPERATURE,
};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Sampling settings shared by every provider call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSettings {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Application configuration loaded from modelscan.toml and the environment
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub models_file: PathBuf,
    pub queries: Vec<String>,
    /// Pause after every (model, query) call
    pub pacing: Duration,
    pub generation: GenerationSettings,
    pub request_timeout: Duration,
    pub openai: HttpProviderConfig,
    pub together: HttpProviderConfig,
    pub gemini: HttpProviderConfig,
    pub bedrock: BedrockConfig,
    pub jumpstart: JumpStartConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models_file: PathBuf::from(DEFAULT_MODELS_FILE),
            queries: vec![DEFAULT_QUERY.to_string()],
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            generation: GenerationSettings::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            openai: HttpProviderConfig::openai(),
            together: HttpProviderConfig::together(),
            gemini: HttpProviderConfig::gemini(),
            bedrock: BedrockConfig::default(),
            jumpstart: JumpStartConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a file path (or default path if None)
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        super::loader::load_config(path)
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        super::loader::parse_config(content, Path::new("<inline>"), |_| None)
    }
}
