//! Provider factory - creates clients from config

use super::clients::{BedrockClient, GeminiClient, JumpStartClient, OpenAIClient, TogetherClient};
use super::traits::ModelProvider;
use crate::config::AppConfig;
use std::env;
use tracing::debug;

/// Resolve API key from environment variable
pub fn resolve_api_key(provider: &str, env_name: &str) -> Option<String> {
    let name = env_name.trim();
    if name.is_empty() {
        return None;
    }
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        Ok(_) | Err(_) => {
            debug!(
                provider,
                env_var = name,
                "API key environment variable is not set"
            );
            None
        }
    }
}

/// Factory for creating every provider adapter from app config.
pub struct ProviderFactory;

impl ProviderFactory {
    /// Builds all adapters in discovery order: openai, together, gemini,
    /// bedrock, jumpstart. Adapters without credentials are still returned
    /// and report themselves as not ready.
    pub fn create_all(config: &AppConfig) -> Vec<Box<dyn ModelProvider>> {
        let settings = config.generation;
        let timeout = config.request_timeout;
        vec![
            Box::new(OpenAIClient::from_config(&config.openai, settings, timeout)),
            Box::new(TogetherClient::from_config(&config.together, settings, timeout)),
            Box::new(GeminiClient::from_config(&config.gemini, settings, timeout)),
            Box::new(BedrockClient::from_config(&config.bedrock, settings, timeout)),
            Box::new(JumpStartClient::from_config(&config.jumpstart, settings, timeout)),
        ]
    }
}
