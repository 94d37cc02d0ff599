//! SageMaker JumpStart client implementation
//!
//! Every `run` deploys a throwaway endpoint, invokes it once and tears it
//! down again. The control plane is driven over the SageMaker JSON 1.1 API
//! (`X-Amz-Target: SageMaker.<Operation>`); invocation goes through
//! `runtime.sagemaker`. Model, endpoint config and endpoint all share the
//! endpoint name.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Method;
use serde_json::{Value, json};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::signed::{SignedClient, service_url, with_segments};
use crate::config::{GenerationSettings, JumpStartConfig};
use crate::constants::{JUMPSTART_LARGE_INSTANCE, JUMPSTART_SMALL_INSTANCE};
use crate::infrastructure::aws::AwsAuth;
use crate::infrastructure::model::adapter::PayloadAdapter;
use crate::infrastructure::model::traits::ModelProvider;
use crate::infrastructure::model::types::{Completion, ProviderError};

pub const JUMPSTART_ID: &str = "jumpstart";
const SAGEMAKER_SERVICE: &str = "sagemaker";
const JSON_11: &str = "application/x-amz-json-1.1";
/// Placement failures worth one more attempt on the fallback instance.
const PLACEMENT_FAILURES: [&str; 3] = [
    "failed to satisfy constraint",
    "insufficientinstancecapacity",
    "insufficient capacity",
];
const ENDPOINT_NOT_FOUND: &str = "could not find endpoint";

/// Instance type for a model id: "120b" gets the large tier, "20b" and "8b"
/// the small tier, anything else the configured default.
pub fn pick_instance(model_id: &str, default_instance: &str) -> String {
    let id = model_id.to_lowercase();
    if id.contains("120b") {
        JUMPSTART_LARGE_INSTANCE.to_string()
    } else if id.contains("20b") || id.contains("8b") {
        JUMPSTART_SMALL_INSTANCE.to_string()
    } else {
        default_instance.to_string()
    }
}

fn is_placement_failure(error: &ProviderError) -> bool {
    let message = error.to_string().to_lowercase();
    PLACEMENT_FAILURES
        .iter()
        .any(|marker| message.contains(marker))
}

fn endpoint_name() -> String {
    format!("jumpstart-ephemeral-{}", Utc::now().timestamp())
}

struct SageMaker {
    client: SignedClient,
    control: Url,
    runtime: Url,
}

/// SageMaker JumpStart client deploying one ephemeral endpoint per call
pub struct JumpStartClient {
    sagemaker: Option<SageMaker>,
    config: JumpStartConfig,
    settings: GenerationSettings,
}

impl JumpStartClient {
    pub fn from_config(
        config: &JumpStartConfig,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        Self::new(config, AwsAuth::sagemaker_from_env(), settings, timeout)
    }

    pub fn new(
        config: &JumpStartConfig,
        auth: Option<AwsAuth>,
        settings: GenerationSettings,
        timeout: Duration,
    ) -> Self {
        let region = config.region.as_str();
        let sagemaker = SignedClient::new(JUMPSTART_ID, region, SAGEMAKER_SERVICE, auth, timeout)
            .and_then(|client| {
                let urls = service_url(
                    JUMPSTART_ID,
                    config.control_endpoint.as_deref(),
                    format!("https://api.sagemaker.{region}.amazonaws.com/"),
                )
                .and_then(|control| {
                    let runtime = service_url(
                        JUMPSTART_ID,
                        config.runtime_endpoint.as_deref(),
                        format!("https://runtime.sagemaker.{region}.amazonaws.com"),
                    )?;
                    Ok((control, runtime))
                });
                match urls {
                    Ok((control, runtime)) => Some(SageMaker {
                        client,
                        control,
                        runtime,
                    }),
                    Err(err) => {
                        warn!(provider = JUMPSTART_ID, error = %err, "Invalid SageMaker endpoint");
                        None
                    }
                }
            });

        Self {
            sagemaker,
            config: config.clone(),
            settings,
        }
    }

    fn parts(&self) -> Option<(&SageMaker, &str)> {
        Some((self.sagemaker.as_ref()?, self.config.exec_role_arn.as_deref()?))
    }

    async fn call(
        &self,
        sagemaker: &SageMaker,
        operation: &str,
        body: &Value,
    ) -> Result<Value, ProviderError> {
        let target = format!("SageMaker.{operation}");
        let payload = serde_json::to_vec(body)
            .map_err(|e| ProviderError::invalid_response(JUMPSTART_ID, e.to_string()))?;
        let response = sagemaker
            .client
            .send(
                Method::POST,
                &sagemaker.control,
                &[("content-type", JSON_11), ("x-amz-target", target.as_str())],
                payload,
            )
            .await?
            .into_result(JUMPSTART_ID)?;

        if response.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response)
            .map_err(|e| ProviderError::invalid_response(JUMPSTART_ID, e.to_string()))
    }

    /// Provision model, endpoint config and endpoint, then wait for
    /// `InService`.
    async fn deploy(
        &self,
        sagemaker: &SageMaker,
        role: &str,
        name: &str,
        model_id: &str,
        instance: &str,
    ) -> Result<(), ProviderError> {
        info!(
            provider = JUMPSTART_ID,
            endpoint = name,
            model = model_id,
            instance,
            "Deploying ephemeral endpoint"
        );
        let model = create_model_body(&self.config, name, role, model_id);
        self.call(sagemaker, "CreateModel", &model).await?;
        self.call(
            sagemaker,
            "CreateEndpointConfig",
            &endpoint_config_body(name, instance),
        )
        .await?;
        self.call(
            sagemaker,
            "CreateEndpoint",
            &json!({ "EndpointName": name, "EndpointConfigName": name }),
        )
        .await?;
        self.wait_in_service(sagemaker, name).await
    }

    async fn wait_in_service(&self, sagemaker: &SageMaker, name: &str) -> Result<(), ProviderError> {
        let deadline = tokio::time::Instant::now() + self.config.endpoint_wait;
        loop {
            let described = self
                .call(sagemaker, "DescribeEndpoint", &json!({ "EndpointName": name }))
                .await?;
            let status = described
                .get("EndpointStatus")
                .and_then(Value::as_str)
                .unwrap_or_default();
            debug!(endpoint = name, status, "Endpoint status");

            match status {
                "InService" => return Ok(()),
                "Failed" => {
                    let reason = described
                        .get("FailureReason")
                        .and_then(Value::as_str)
                        .unwrap_or("endpoint entered Failed state");
                    return Err(ProviderError::provisioning(JUMPSTART_ID, reason));
                }
                _ => {}
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(ProviderError::provisioning(
                    JUMPSTART_ID,
                    format!(
                        "endpoint {name} not in service after {}s",
                        self.config.endpoint_wait.as_secs()
                    ),
                ));
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    /// One retry on the configured default instance after a placement
    /// failure, unless the first attempt already used it.
    async fn deploy_with_fallback(
        &self,
        sagemaker: &SageMaker,
        role: &str,
        name: &str,
        model_id: &str,
    ) -> Result<(), ProviderError> {
        let fallback = self.config.default_instance.as_str();
        let instance = pick_instance(model_id, fallback);
        match self.deploy(sagemaker, role, name, model_id, &instance).await {
            Err(err) if is_placement_failure(&err) && instance != fallback => {
                warn!(
                    provider = JUMPSTART_ID,
                    instance = instance.as_str(),
                    fallback,
                    error = %err,
                    "Retrying deployment with fallback instance"
                );
                self.teardown(sagemaker, name).await;
                self.deploy(sagemaker, role, name, model_id, fallback).await
            }
            other => other,
        }
    }

    async fn invoke(
        &self,
        sagemaker: &SageMaker,
        name: &str,
        prompt: &str,
    ) -> Result<Completion, ProviderError> {
        let url = with_segments(&sagemaker.runtime, &["endpoints", name, "invocations"])?;
        let body = serde_json::to_vec(&PayloadAdapter::to_text_generation(prompt, self.settings))
            .map_err(|e| ProviderError::invalid_response(JUMPSTART_ID, e.to_string()))?;

        let started = Instant::now();
        let response = sagemaker
            .client
            .send(
                Method::POST,
                &url,
                &[
                    ("content-type", "application/json"),
                    ("accept", "application/json"),
                ],
                body,
            )
            .await?
            .into_result(JUMPSTART_ID)?;
        Ok(Completion::new(response, started.elapsed()))
    }

    /// Best effort; every failure is logged and swallowed.
    async fn teardown(&self, sagemaker: &SageMaker, name: &str) {
        let endpoint = json!({ "EndpointName": name });
        match self.call(sagemaker, "DeleteEndpoint", &endpoint).await {
            Ok(_) => self.wait_deleted(sagemaker, name).await,
            Err(err) => {
                warn!(endpoint = name, error = %err, "Cleanup failed or endpoint already gone");
            }
        }

        let steps = [
            ("DeleteEndpointConfig", json!({ "EndpointConfigName": name })),
            ("DeleteModel", json!({ "ModelName": name })),
        ];
        for (operation, body) in steps {
            if let Err(err) = self.call(sagemaker, operation, &body).await {
                warn!(endpoint = name, operation, error = %err, "Cleanup step failed");
            }
        }
        info!(provider = JUMPSTART_ID, endpoint = name, "Ephemeral endpoint torn down");
    }

    async fn wait_deleted(&self, sagemaker: &SageMaker, name: &str) {
        let deadline = tokio::time::Instant::now() + self.config.endpoint_wait;
        loop {
            match self
                .call(sagemaker, "DescribeEndpoint", &json!({ "EndpointName": name }))
                .await
            {
                Err(err) if err.to_string().to_lowercase().contains(ENDPOINT_NOT_FOUND) => return,
                Err(err) => {
                    warn!(endpoint = name, error = %err, "Could not confirm endpoint deletion");
                    return;
                }
                Ok(_) => {}
            }
            if tokio::time::Instant::now() >= deadline {
                warn!(endpoint = name, "Endpoint still present after wait");
                return;
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}

fn create_model_body(config: &JumpStartConfig, name: &str, role: &str, model_id: &str) -> Value {
    let image = config.image_uri.replace("{region}", &config.region);
    let container = match &config.model_data_uri {
        Some(template) => {
            let uri = template
                .replace("{model_id}", model_id)
                .replace("{region}", &config.region);
            json!({
                "Image": image,
                "ModelDataSource": {
                    "S3DataSource": {
                        "S3Uri": uri,
                        "S3DataType": "S3Prefix",
                        "CompressionType": "None",
                        "ModelAccessConfig": {
                            "AcceptEula": model_id.to_lowercase().contains("llama")
                        }
                    }
                }
            })
        }
        None => json!({
            "Image": image,
            "Environment": { "HF_MODEL_ID": model_id }
        }),
    };
    json!({
        "ModelName": name,
        "ExecutionRoleArn": role,
        "PrimaryContainer": container
    })
}

fn endpoint_config_body(name: &str, instance: &str) -> Value {
    json!({
        "EndpointConfigName": name,
        "ProductionVariants": [{
            "VariantName": "AllTraffic",
            "ModelName": name,
            "InitialInstanceCount": 1,
            "InstanceType": instance
        }]
    })
}

#[async_trait]
impl ModelProvider for JumpStartClient {
    fn id(&self) -> &str {
        JUMPSTART_ID
    }

    fn is_ready(&self) -> bool {
        self.parts().is_some()
    }

    /// Hub discovery is expensive; only the configured ids are offered.
    async fn list_models(&self) -> Vec<String> {
        if !self.is_ready() {
            return Vec::new();
        }
        self.config
            .models
            .iter()
            .map(|model| model.trim().to_lowercase())
            .filter(|model| !model.is_empty())
            .collect()
    }

    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError> {
        let (sagemaker, role) = self
            .parts()
            .ok_or_else(|| ProviderError::not_initialized("SageMaker JumpStart"))?;
        let name = endpoint_name();

        let outcome = match self.deploy_with_fallback(sagemaker, role, &name, model_id).await {
            Ok(()) => self.invoke(sagemaker, &name, prompt).await,
            Err(err) => Err(err),
        };
        self.teardown(sagemaker, &name).await;
        outcome
    }
}
