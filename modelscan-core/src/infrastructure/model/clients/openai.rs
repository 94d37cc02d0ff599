//! OpenAI client implementation

use async_trait::async_trait;
use serde::Deserialize;
use std::env;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::base::HttpClientBase;
use crate::config::{GenerationSettings, HttpProviderConfig};
use crate::infrastructure::model::adapter::PayloadAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{Completion, ProviderError};

pub const OPENAI_ID: &str = "openai";

/// OpenAI client; the client is only built when `OPENAI_API_KEY` is set.
pub struct OpenAIClient {
    base: Option<HttpClientBase>,
    organization: Option<String>,
    project: Option<String>,
    settings: GenerationSettings,
}

impl OpenAIClient {
    pub fn from_config(
        config: &HttpProviderConfig,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        let api_key = resolve_api_key(OPENAI_ID, &config.api_key_env);
        Self::new(&config.endpoint, api_key, settings, timeout)
            .with_organization(env::var("OPENAI_ORG_ID").ok())
            .with_project(env::var("OPENAI_PROJECT").ok())
    }

    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            base: HttpClientBase::new(OPENAI_ID, endpoint, api_key, timeout),
            organization: None,
            project: None,
            settings,
        }
    }

    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        self.organization = organization.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_project(mut self, project: Option<String>) -> Self {
        self.project = project.filter(|value| !value.trim().is_empty());
        self
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        let mut headers = Vec::new();
        if let Some(organization) = &self.organization {
            headers.push(("OpenAI-Organization", organization.as_str()));
        }
        if let Some(project) = &self.project {
            headers.push(("OpenAI-Project", project.as_str()));
        }
        headers
    }
}

/// One chat-completions round trip; shared by OpenAI-compatible providers.
pub(super) async fn chat_completion(
    base: &HttpClientBase,
    model_id: &str,
    prompt: &str,
    settings: GenerationSettings,
    headers: &[(&str, &str)],
) -> Result<Completion, ProviderError> {
    let url = base.build_url("/v1/chat/completions");
    let payload = PayloadAdapter::to_chat_completion(model_id, prompt, settings);

    info!(
        provider = base.id.as_str(),
        model = model_id,
        "Sending chat completion request"
    );

    let started = Instant::now();
    let response: ChatCompletionResponse = base.post_with_bearer(&url, &payload, headers).await?;
    let elapsed = started.elapsed();
    debug!(provider = base.id.as_str(), "Received chat completion response");

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::invalid_response(&base.id, "missing choices"))?;
    let text = choice
        .message
        .and_then(|message| message.content)
        .unwrap_or_default();

    Ok(Completion::new(text, elapsed))
}

#[async_trait]
impl ModelProvider for OpenAIClient {
    fn id(&self) -> &str {
        OPENAI_ID
    }

    fn is_ready(&self) -> bool {
        self.base.is_some()
    }

    async fn list_models(&self) -> Vec<String> {
        let Some(base) = &self.base else {
            return Vec::new();
        };
        let url = base.build_url("/v1/models");
        match base
            .get_with_bearer::<ModelList>(&url, &self.headers())
            .await
        {
            Ok(list) => list.data.into_iter().map(|m| m.id.to_lowercase()).collect(),
            Err(err) => {
                warn!(provider = OPENAI_ID, error = %err, "Listing models failed");
                Vec::new()
            }
        }
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| ProviderError::not_initialized(OPENAI_ID))?;
        chat_completion(base, model_id, prompt, self.settings, &self.headers()).await
    }
}

#[derive(Deserialize)]
struct ModelList {
    data: Vec<ModelEntry>,
}

#[derive(Deserialize)]
pub(super) struct ModelEntry {
    pub(super) id: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}
