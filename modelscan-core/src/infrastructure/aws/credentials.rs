use std::env;
use std::fmt;

/// Static credentials used for SigV4 signing.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl AwsCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Read `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
    /// `AWS_SESSION_TOKEN`.
    pub fn from_env() -> Option<Self> {
        let access_key_id = non_empty_var("AWS_ACCESS_KEY_ID")?;
        let secret_access_key = non_empty_var("AWS_SECRET_ACCESS_KEY")?;
        Some(Self {
            access_key_id,
            secret_access_key,
            session_token: non_empty_var("AWS_SESSION_TOKEN"),
        })
    }
}

/// How a request to an AWS service is authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwsAuth {
    Sigv4(AwsCredentials),
    /// Bedrock API keys (`AWS_BEARER_TOKEN_BEDROCK`)
    Bearer(String),
}

impl AwsAuth {
    /// Bedrock accepts either signed requests or a bearer API key.
    pub fn bedrock_from_env() -> Option<Self> {
        AwsCredentials::from_env()
            .map(Self::Sigv4)
            .or_else(|| non_empty_var("AWS_BEARER_TOKEN_BEDROCK").map(Self::Bearer))
    }

    /// SageMaker only accepts signed requests.
    pub fn sagemaker_from_env() -> Option<Self> {
        AwsCredentials::from_env().map(Self::Sigv4)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
