//! Application constants
//!
//! Single source of truth for paths, endpoints and tuning defaults.

/// Default configuration file path
pub const CONFIG_PATH: &str = "config/modelscan.toml";

/// Default environment file path
pub const ENV_PATH: &str = "config/.env";

/// Requested models file used when nothing else is configured
pub const DEFAULT_MODELS_FILE: &str = "data/top_10_models.json";

/// Environment variable overriding the requested models file
pub const MODELS_FILE_ENV: &str = "MODELS_JSON";

pub const DEFAULT_QUERY: &str = "In one sentence, explain why caching improves performance.";

pub const DEFAULT_PACING_MS: u64 = 250;
pub const DEFAULT_MAX_TOKENS: u32 = 128;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Maximum characters kept in a run record preview
pub const PREVIEW_LIMIT: usize = 240;
pub const PREVIEW_MARKER: char = '…';

pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com";
pub const DEFAULT_TOGETHER_ENDPOINT: &str = "https://api.together.xyz";
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini API path
pub const DEFAULT_GEMINI_API_PATH: &str = "v1beta/models";

pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_JUMPSTART_REGION: &str = "us-east-2";
pub const DEFAULT_JUMPSTART_INSTANCE: &str = "ml.g5.2xlarge";
pub const JUMPSTART_LARGE_INSTANCE: &str = "ml.p5.48xlarge";
pub const JUMPSTART_SMALL_INSTANCE: &str = "ml.g5.2xlarge";

/// Hugging Face TGI inference container used for ephemeral endpoints;
/// `{region}` is replaced with the JumpStart region
pub const DEFAULT_JUMPSTART_IMAGE: &str = "763104351884.dkr.ecr.{region}.amazonaws.com/huggingface-pytorch-tgi-inference:2.4.0-tgi3.0.1-gpu-py311-cu124-ubuntu22.04";

pub const DEFAULT_ENDPOINT_WAIT_SECS: u64 = 1800;
