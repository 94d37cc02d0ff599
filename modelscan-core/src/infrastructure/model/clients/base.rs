//! Base HTTP client with shared logic

use crate::infrastructure::model::types::{ProviderError, extract_error_message};
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::warn;

/// Build the shared HTTP client, or `None` when the TLS backend cannot start.
pub fn build_http(provider: &str, timeout: Duration) -> Option<Client> {
    match Client::builder().timeout(timeout).build() {
        Ok(client) => Some(client),
        Err(err) => {
            warn!(provider, %err, "Failed to build HTTP client");
            None
        }
    }
}

/// Base HTTP client for API-key authenticated providers
#[derive(Clone)]
pub struct HttpClientBase {
    pub id: String,
    pub endpoint: String,
    pub api_key: String,
    pub http: Client,
}

impl HttpClientBase {
    /// Returns `None` unless an API key is present.
    pub fn new(
        id: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Option<Self> {
        let id = id.into();
        let api_key = api_key.filter(|key| !key.trim().is_empty())?;
        let http = build_http(&id, timeout)?;
        Some(Self {
            id,
            endpoint: endpoint.into(),
            api_key,
            http,
        })
    }

    /// Build URL from endpoint and path
    pub fn build_url(&self, path: &str) -> String {
        let base = self.endpoint.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// Get JSON with bearer auth
    pub async fn get_with_bearer<Res>(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Res, ProviderError>
    where
        Res: DeserializeOwned,
    {
        let request = self.http.get(url).bearer_auth(&self.api_key);
        self.send(with_headers(request, headers)).await
    }

    /// Post JSON with bearer auth
    pub async fn post_with_bearer<Req, Res>(
        &self,
        url: &str,
        body: &Req,
        headers: &[(&str, &str)],
    ) -> Result<Res, ProviderError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = self.http.post(url).bearer_auth(&self.api_key).json(body);
        self.send(with_headers(request, headers)).await
    }

    /// Get JSON with query param auth (for Gemini)
    pub async fn get_with_query_key<Res>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<Res, ProviderError>
    where
        Res: DeserializeOwned,
    {
        let request = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(query);
        self.send(request).await
    }

    /// Post JSON with query param auth (for Gemini)
    pub async fn post_with_query_key<Req, Res>(
        &self,
        url: &str,
        body: &Req,
    ) -> Result<Res, ProviderError>
    where
        Req: Serialize + ?Sized,
        Res: DeserializeOwned,
    {
        let request = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body);
        self.send(request).await
    }

    async fn send<Res>(&self, request: RequestBuilder) -> Result<Res, ProviderError>
    where
        Res: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::network(&self.id, e))?;
        decode_json(&self.id, response).await
    }
}

fn with_headers(mut request: RequestBuilder, headers: &[(&str, &str)]) -> RequestBuilder {
    for (name, value) in headers {
        request = request.header(*name, *value);
    }
    request
}

/// Decode a JSON body, turning non-success statuses into `ProviderError::Api`
/// with the vendor's message.
pub async fn decode_json<Res>(provider: &str, response: Response) -> Result<Res, ProviderError>
where
    Res: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::api(
            provider,
            status.as_u16(),
            extract_error_message(&body),
        ));
    }
    response
        .json()
        .await
        .map_err(|e| ProviderError::invalid_response(provider, e.to_string()))
}
