//! HTTP client for AWS services, authenticating each request with SigV4 (or a
//! Bedrock bearer key)

use chrono::Utc;
use reqwest::{Client, Method};
use std::time::Duration;
use url::Url;

use super::base::build_http;
use crate::infrastructure::aws::{AwsAuth, sign_request};
use crate::infrastructure::model::types::{ProviderError, extract_error_message};

/// Raw HTTP exchange result: status plus body text.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Convert a non-success response into `ProviderError::Api`.
    pub fn into_result(self, provider: &str) -> Result<String, ProviderError> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(ProviderError::api(
                provider,
                self.status,
                extract_error_message(&self.body),
            ))
        }
    }
}

#[derive(Clone)]
pub struct SignedClient {
    pub id: String,
    pub region: String,
    service: String,
    auth: AwsAuth,
    http: Client,
}

impl SignedClient {
    /// Returns `None` without credentials.
    pub fn new(
        id: impl Into<String>,
        region: impl Into<String>,
        service: impl Into<String>,
        auth: Option<AwsAuth>,
        timeout: Duration,
    ) -> Option<Self> {
        let id = id.into();
        let auth = auth?;
        let http = build_http(&id, timeout)?;
        Some(Self {
            id,
            region: region.into(),
            service: service.into(),
            auth,
            http,
        })
    }

    /// Send a request and return the raw status and body.
    ///
    /// `headers` are sent and signed; `content-type` belongs there when a body
    /// is present.
    pub async fn send(
        &self,
        method: Method,
        url: &Url,
        headers: &[(&str, &str)],
        body: Vec<u8>,
    ) -> Result<RawResponse, ProviderError> {
        let mut request = self.http.request(method.clone(), url.as_str());
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        match &self.auth {
            AwsAuth::Bearer(token) => {
                request = request.bearer_auth(token);
            }
            AwsAuth::Sigv4(credentials) => {
                let signed = sign_request(
                    method.as_str(),
                    url,
                    headers,
                    &body,
                    credentials,
                    &self.region,
                    &self.service,
                    Utc::now(),
                )
                .map_err(|source| ProviderError::signing(&self.id, source))?;
                request = request
                    .header("Authorization", signed.authorization)
                    .header("x-amz-date", signed.amz_date)
                    .header("x-amz-content-sha256", signed.payload_hash);
                if let Some(token) = signed.security_token {
                    request = request.header("x-amz-security-token", token);
                }
            }
        }

        let response = request
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::network(&self.id, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(&self.id, e))?;
        Ok(RawResponse { status, body })
    }
}

/// Parse a base URL from config or the regional default.
pub fn service_url(
    provider: &str,
    override_url: Option<&str>,
    default: String,
) -> Result<Url, ProviderError> {
    let raw = override_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .unwrap_or(default);
    Url::parse(&raw)
        .map_err(|err| ProviderError::invalid_response(provider, format!("invalid URL {raw}: {err}")))
}

/// Append path segments, percent-encoding each one.
pub fn with_segments(base: &Url, segments: &[&str]) -> Result<Url, ProviderError> {
    let mut url = base.clone();
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|()| ProviderError::invalid_response("aws", "base URL cannot hold a path"))?;
        path.pop_if_empty();
        for segment in segments {
            path.push(segment);
        }
    }
    Ok(url)
}
