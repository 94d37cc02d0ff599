//! Amazon Bedrock client implementation
//!
//! Lists foundation models through the control plane and invokes them through
//! `bedrock-runtime`'s `InvokeModel`. Listing also refreshes a lookup from
//! lowercase model names and ids to the exact `modelId`, since catalog
//! entries carry lowercase identifiers.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use url::Url;

use super::signed::{SignedClient, service_url, with_segments};
use crate::config::{BedrockConfig, GenerationSettings};
use crate::infrastructure::aws::AwsAuth;
use crate::infrastructure::model::adapter::{PayloadAdapter, bedrock_family};
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{Completion, ProviderError, classify_invoke_failure};

pub const BEDROCK_ID: &str = "bedrock";
const BEDROCK_SERVICE: &str = "bedrock";

struct BedrockEndpoints {
    control: Url,
    runtime: Url,
}

/// Amazon Bedrock client
pub struct BedrockClient {
    client: Option<SignedClient>,
    endpoints: Option<BedrockEndpoints>,
    settings: GenerationSettings,
    lookup: RwLock<HashMap<String, String>>,
}

impl BedrockClient {
    pub fn from_config(
        config: &BedrockConfig,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self::new(config, AwsAuth::bedrock_from_env(), settings, timeout)
    }

    pub fn new(
        config: &BedrockConfig,
        auth: Option<AwsAuth>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        let region = config.region.as_str();
        let endpoints = service_url(
            BEDROCK_ID,
            config.control_endpoint.as_deref(),
            format!("https://bedrock.{region}.amazonaws.com"),
        )
        .and_then(|control| {
            let runtime = service_url(
                BEDROCK_ID,
                config.runtime_endpoint.as_deref(),
                format!("https://bedrock-runtime.{region}.amazonaws.com"),
            )?;
            Ok(BedrockEndpoints { control, runtime })
        });
        let endpoints = match endpoints {
            Ok(endpoints) => Some(endpoints),
            Err(err) => {
                warn!(provider = BEDROCK_ID, error = %err, "Invalid Bedrock endpoint");
                None
            }
        };

        Self {
            client: SignedClient::new(BEDROCK_ID, region, BEDROCK_SERVICE, auth, timeout),
            endpoints,
            settings,
            lookup: RwLock::new(HashMap::new()),
        }
    }

    fn parts(&self) -> Option<(&SignedClient, &BedrockEndpoints)> {
        Some((self.client.as_ref()?, self.endpoints.as_ref()?))
    }

    async fn fetch_summaries(
        &self,
        client: &SignedClient,
        endpoints: &BedrockEndpoints,
    ) -> Result<Vec<ModelSummary>, ProviderError> {
        let url = with_segments(&endpoints.control, &["foundation-models"])?;
        let response = client
            .send(Method::GET, &url, &[], Vec::new())
            .await?
            .into_result(BEDROCK_ID)?;
        let listing: FoundationModels = serde_json::from_str(&response)
            .map_err(|e| ProviderError::invalid_response(BEDROCK_ID, e.to_string()))?;
        Ok(listing.model_summaries)
    }

    async fn resolve(&self, model_id: &str) -> String {
        self.lookup
            .read()
            .await
            .get(&model_id.to_lowercase())
            .cloned()
            .unwrap_or_else(|| model_id.to_string())
    }
}

#[async_trait]
impl ModelProvider for BedrockClient {
    fn id(&self) -> &str {
        BEDROCK_ID
    }

    fn is_ready(&self) -> bool {
        self.parts().is_some()
    }

    async fn list_models(&self) -> Vec<String> {
        let Some((client, endpoints)) = self.parts() else {
            return Vec::new();
        };
        let summaries = match self.fetch_summaries(client, endpoints).await {
            Ok(summaries) => summaries,
            Err(err) => {
                warn!(provider = BEDROCK_ID, error = %err, "Bedrock model listing failed");
                return Vec::new();
            }
        };

        let mut lookup = self.lookup.write().await;
        lookup.clear();
        for summary in &summaries {
            if let Some(name) = &summary.model_name {
                lookup.insert(name.to_lowercase(), summary.model_id.clone());
            }
            lookup.insert(summary.model_id.to_lowercase(), summary.model_id.clone());
        }
        debug!(entries = lookup.len(), "Refreshed Bedrock model lookup");

        summaries
            .into_iter()
            .map(|summary| summary.model_id.to_lowercase())
            .collect()
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        let (client, endpoints) = self
            .parts()
            .ok_or_else(|| ProviderError::not_initialized("Bedrock"))?;
        let resolved = self.resolve(model_id).await;
        let url = with_segments(&endpoints.runtime, &["model", resolved.as_str(), "invoke"])?;
        let body = serde_json::to_vec(&PayloadAdapter::to_bedrock(&resolved, prompt, self.settings))
            .map_err(|e| ProviderError::invalid_response(BEDROCK_ID, e.to_string()))?;

        info!(provider = BEDROCK_ID, model = resolved.as_str(), "Invoking Bedrock model");

        let started = Instant::now();
        let response = client
            .send(
                Method::POST,
                &url,
                &[
                    ("content-type", "application/json"),
                    ("accept", "application/json"),
                ],
                body,
            )
            .await
            .and_then(|raw| raw.into_result(BEDROCK_ID))
            .map_err(|err| classify_invoke_failure(err, &resolved))?;
        let elapsed = started.elapsed();

        let text = if bedrock_family(&resolved) == "anthropic" {
            PayloadAdapter::anthropic_text(&response).unwrap_or(response)
        } else {
            response
        };
        Ok(Completion::new(text, elapsed))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoundationModels {
    #[serde(default)]
    model_summaries: Vec<ModelSummary>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelSummary {
    model_id: String,
    model_name: Option<String>,
}
