//! Gemini client implementation

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::base::HttpClientBase;
use crate::config::{GenerationSettings, HttpProviderConfig};
use crate::constants::DEFAULT_GEMINI_API_PATH;
use crate::infrastructure::model::adapter::PayloadAdapter;
use crate::infrastructure::model::factory::resolve_api_key;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{Completion, ProviderError};

pub const GEMINI_ID: &str = "gemini";

/// Upper bound on listing pages, in case the API keeps returning tokens
const MAX_LIST_PAGES: usize = 20;

/// Gemini client for Google AI
pub struct GeminiClient {
    base: Option<HttpClientBase>,
    api_path: String,
    settings: GenerationSettings,
}

impl GeminiClient {
    pub fn from_config(
        config: &HttpProviderConfig,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        let api_key = resolve_api_key(GEMINI_ID, &config.api_key_env);
        Self::new(&config.endpoint, api_key, settings, timeout)
    }

    pub fn new(
        endpoint: &str,
        api_key: Option<String>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self {
            base: HttpClientBase::new(GEMINI_ID, endpoint, api_key, timeout),
            api_path: DEFAULT_GEMINI_API_PATH.to_string(),
            settings,
        }
    }

    fn build_model_url(base: &HttpClientBase, api_path: &str, model: &str) -> String {
        base.build_url(&format!("{api_path}/{model}:generateContent"))
    }

    async fn fetch_models(&self, base: &HttpClientBase) -> Result<Vec<String>, ProviderError> {
        let url = base.build_url(&self.api_path);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_LIST_PAGES {
            let mut query = vec![("pageSize", "1000")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }
            let page: GeminiModelPage = base.get_with_query_key(&url, &query).await?;
            models.extend(page.models.into_iter().map(|m| m.name.to_lowercase()));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }
        Ok(models)
    }
}

/// `models/gemini-1.5-pro` -> `gemini-1.5-pro`
fn short_model_id(model_id: &str) -> &str {
    model_id.rsplit('/').next().unwrap_or(model_id)
}

#[async_trait]
impl ModelProvider for GeminiClient {
    fn id(&self) -> &str {
        GEMINI_ID
    }

    fn is_ready(&self) -> bool {
        self.base.is_some()
    }

    async fn list_models(&self) -> Vec<String> {
        let Some(base) = &self.base else {
            return Vec::new();
        };
        match self.fetch_models(base).await {
            Ok(models) => models,
            Err(err) => {
                warn!(provider = GEMINI_ID, error = %err, "Listing models failed");
                Vec::new()
            }
        }
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| ProviderError::not_initialized(GEMINI_ID))?;
        let model = short_model_id(model_id);
        let url = Self::build_model_url(base, &self.api_path, model);
        let payload = PayloadAdapter::to_gemini(prompt, self.settings);

        info!(provider = GEMINI_ID, model, "Sending request to Gemini");

        let started = Instant::now();
        let response: Value = base.post_with_query_key(&url, &payload).await?;
        let elapsed = started.elapsed();
        debug!("Received response from Gemini");

        Ok(Completion::new(PayloadAdapter::gemini_text(&response), elapsed))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiModelPage {
    #[serde(default)]
    models: Vec<GeminiModel>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct GeminiModel {
    name: String,
}
