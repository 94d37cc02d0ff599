//! # Provider Configuration
//!
//! Per-provider settings. Secrets never live in the config file: each HTTP
//! provider names the environment variable its API key is read from, and the
//! AWS-hosted providers resolve credentials from the standard AWS variables.
//!
//! | Section | Key variable | Default endpoint / region |
//! |---------|--------------|---------------------------|
//! | `[openai]` | `OPENAI_API_KEY` | `https://api.openai.com` |
//! | `[together]` | `TOGETHER_API_KEY` | `https://api.together.xyz` |
//! | `[gemini]` | `GOOGLE_API_KEY` | `https://generativelanguage.googleapis.com` |
//! | `[bedrock]` | AWS credentials | `us-east-1` |
//! | `[jumpstart]` | AWS credentials + role | `us-east-2` |

use serde::Deserialize;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BEDROCK_REGION, DEFAULT_ENDPOINT_WAIT_SECS, DEFAULT_GEMINI_ENDPOINT,
    DEFAULT_JUMPSTART_IMAGE, DEFAULT_JUMPSTART_INSTANCE, DEFAULT_JUMPSTART_REGION,
    DEFAULT_OPENAI_ENDPOINT, DEFAULT_TOGETHER_ENDPOINT,
};

/// Settings for an API-key authenticated HTTP provider.
///
/// ```toml
/// [together]
/// endpoint = "https://api.together.xyz"
/// api_key_env = "TOGETHER_API_KEY"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    pub endpoint: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
}

impl HttpProviderConfig {
    pub fn openai() -> Self {
        Self::new(DEFAULT_OPENAI_ENDPOINT, "OPENAI_API_KEY")
    }

    pub fn together() -> Self {
        Self::new(DEFAULT_TOGETHER_ENDPOINT, "TOGETHER_API_KEY")
    }

    pub fn gemini() -> Self {
        Self::new(DEFAULT_GEMINI_ENDPOINT, "GOOGLE_API_KEY")
    }

    fn new(endpoint: &str, api_key_env: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key_env: api_key_env.to_string(),
        }
    }

    pub(super) fn merged(mut self, raw: Option<RawHttpProvider>) -> Self {
        if let Some(raw) = raw {
            if let Some(endpoint) = raw.endpoint {
                self.endpoint = endpoint;
            }
            if let Some(api_key_env) = raw.api_key_env {
                self.api_key_env = api_key_env;
            }
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BedrockConfig {
    pub region: String,
    /// Overrides `https://bedrock.{region}.amazonaws.com`
    pub control_endpoint: Option<String>,
    /// Overrides `https://bedrock-runtime.{region}.amazonaws.com`
    pub runtime_endpoint: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_BEDROCK_REGION.to_string(),
            control_endpoint: None,
            runtime_endpoint: None,
        }
    }
}

/// Settings for ephemeral SageMaker JumpStart deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JumpStartConfig {
    pub region: String,
    /// Overrides `https://api.sagemaker.{region}.amazonaws.com`
    pub control_endpoint: Option<String>,
    /// Overrides `https://runtime.sagemaker.{region}.amazonaws.com`
    pub runtime_endpoint: Option<String>,
    pub exec_role_arn: Option<String>,
    pub default_instance: String,
    /// Inference container image for the ephemeral model; `{region}` is
    /// substituted, since SageMaker pulls images from the endpoint's region
    pub image_uri: String,
    /// S3 prefix template for packaged model artifacts; `{model_id}` and
    /// `{region}` are substituted. When unset the container pulls weights
    /// through `HF_MODEL_ID`.
    pub model_data_uri: Option<String>,
    /// Model ids offered for matching; listing the JumpStart hub is not done
    pub models: Vec<String>,
    pub endpoint_wait: Duration,
    pub poll_interval: Duration,
}

impl Default for JumpStartConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_JUMPSTART_REGION.to_string(),
            control_endpoint: None,
            runtime_endpoint: None,
            exec_role_arn: None,
            default_instance: DEFAULT_JUMPSTART_INSTANCE.to_string(),
            image_uri: DEFAULT_JUMPSTART_IMAGE.to_string(),
            model_data_uri: None,
            models: Vec::new(),
            endpoint_wait: Duration::from_secs(DEFAULT_ENDPOINT_WAIT_SECS),
            poll_interval: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawHttpProvider {
    pub(super) endpoint: Option<String>,
    pub(super) api_key_env: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawBedrock {
    pub(super) region: Option<String>,
    pub(super) control_endpoint: Option<String>,
    pub(super) runtime_endpoint: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(super) struct RawJumpStart {
    pub(super) region: Option<String>,
    pub(super) control_endpoint: Option<String>,
    pub(super) runtime_endpoint: Option<String>,
    pub(super) exec_role_arn: Option<String>,
    pub(super) default_instance: Option<String>,
    pub(super) image_uri: Option<String>,
    pub(super) model_data_uri: Option<String>,
    #[serde(default)]
    pub(super) models: Vec<String>,
    pub(super) endpoint_wait_secs: Option<u64>,
    pub(super) poll_interval_secs: Option<u64>,
}

impl From<RawBedrock> for BedrockConfig {
    fn from(raw: RawBedrock) -> Self {
        let defaults = Self::default();
        Self {
            region: raw.region.unwrap_or(defaults.region),
            control_endpoint: raw.control_endpoint,
            runtime_endpoint: raw.runtime_endpoint,
        }
    }
}

impl From<RawJumpStart> for JumpStartConfig {
    fn from(raw: RawJumpStart) -> Self {
        let defaults = Self::default();
        Self {
            region: raw.region.unwrap_or(defaults.region),
            control_endpoint: raw.control_endpoint,
            runtime_endpoint: raw.runtime_endpoint,
            exec_role_arn: raw.exec_role_arn.filter(|arn| !arn.trim().is_empty()),
            default_instance: raw.default_instance.unwrap_or(defaults.default_instance),
            image_uri: raw.image_uri.unwrap_or(defaults.image_uri),
            model_data_uri: raw.model_data_uri,
            models: raw.models,
            endpoint_wait: raw
                .endpoint_wait_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.endpoint_wait),
            poll_interval: raw
                .poll_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.poll_interval),
        }
    }
}
