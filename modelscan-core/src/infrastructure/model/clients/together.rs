//! Together client implementation

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::warn;

use super::base::HttpClientBase;
use super::openai::{ModelEntry, chat_completion};
use crate::config::{GenerationSettings, HttpProviderConfig};
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{Completion, ProviderError};

pub const TOGETHER_ID: &str = "together";

/// Together AI client (OpenAI-compatible chat envelope)
pub struct TogetherClient {
    base: Option<HttpClientBase>,
    settings: GenerationSettings,
}

impl TogetherClient {
    pub fn from_config(
        config: &HttpProviderConfig,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        let api_key = resolve_api_key(TOGETHER_ID, &config.api_key_env);
        Self::new(&config.endpoint, api_key, settings, timeout)
    }

    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            base: HttpClientBase::new(TOGETHER_ID, endpoint, api_key, timeout),
            settings,
        }
    }
}

#[async_trait]
impl ModelProvider for TogetherClient {
    fn id(&self) -> &str {
        TOGETHER_ID
    }

    fn is_ready(&self) -> bool {
        self.base.is_some()
    }

    async fn list_models(&self) -> Vec<String> {
        let Some(base) = &self.base else {
            return Vec::new();
        };
        let url = base.build_url("/v1/models");
        match base.get_with_bearer::<TogetherModels>(&url, &[]).await {
            Ok(models) => models
                .into_entries()
                .into_iter()
                .map(|m| m.id.to_lowercase())
                .collect(),
            Err(err) => {
                warn!(provider = TOGETHER_ID, error = %err, "Listing models failed");
                Vec::new()
            }
        }
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| ProviderError::not_initialized(TOGETHER_ID))?;
        chat_completion(base, model_id, prompt, self.settings, &[]).await
    }
}

/// Together returns a bare array; OpenAI-compatible gateways wrap it in `data`.
#[derive(Deserialize)]
#[serde(untagged)]
enum TogetherModels {
    Bare(Vec<ModelEntry>),
    Wrapped { data: Vec<ModelEntry> },
}

impl TogetherModels {
    fn into_entries(self) -> Vec<ModelEntry> {
        match self {
            TogetherModels::Bare(entries) | TogetherModels::Wrapped { data: entries } => entries,
        }
    }
}
