//! Model types - Completion and Error types

use crate::infrastructure::aws::SigningError;
use std::time::Duration;
use thiserror::Error;

/// Text produced by one inference call and the time spent in that call.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub elapsed: Duration,
}

impl Completion {
    pub fn new(text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            text: text.into(),
            elapsed,
        }
    }
}

/// Provider errors
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} client not initialized")]
    NotInitialized { provider: String },
    #[error("network error calling provider '{provider}': {source}")]
    Network {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("provider '{provider}' returned {status}: {message}")]
    Api {
        provider: String,
        status: u16,
        message: String,
    },
    #[error("provider '{provider}' returned invalid response: {reason}")]
    InvalidResponse { provider: String, reason: String },
    #[error("On-demand not supported for {model}")]
    OnDemandUnsupported { model: String },
    #[error("provisioning on '{provider}' failed: {message}")]
    Provisioning { provider: String, message: String },
    #[error("failed to sign request for '{provider}': {source}")]
    Signing {
        provider: String,
        #[source]
        source: SigningError,
    },
}

impl ProviderError {
    pub fn not_initialized(provider: impl Into<String>) -> Self {
        Self::NotInitialized {
            provider: provider.into(),
        }
    }

    pub fn network(provider: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            provider: provider.into(),
            source,
        }
    }

    pub fn api(provider: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            provider: provider.into(),
            status,
            message: message.into(),
        }
    }

    pub fn invalid_response(provider: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.into(),
            reason: reason.into(),
        }
    }

    pub fn on_demand_unsupported(model: impl Into<String>) -> Self {
        Self::OnDemandUnsupported {
            model: model.into(),
        }
    }

    pub fn provisioning(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provisioning {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn signing(provider: impl Into<String>, source: SigningError) -> Self {
        Self::Signing {
            provider: provider.into(),
            source,
        }
    }

    /// The managed-endpoint restriction that is an expected outcome, not a fault.
    pub fn is_on_demand_unsupported(&self) -> bool {
        matches!(self, Self::OnDemandUnsupported { .. })
    }

    /// Vendor message text carried by the error, if any.
    pub fn vendor_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Provisioning { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Vendor wording for models that require provisioned throughput. Matching on
/// free text is fragile: if the vendor rewords the message, affected calls
/// surface as ordinary API errors instead.
const ON_DEMAND_UNSUPPORTED_MARKERS: [&str; 2] = [
    "on-demand throughput isn’t supported",
    "on-demand throughput isn't supported",
];

/// Map a failed invocation to the on-demand restriction when the vendor
/// message says so; otherwise return the error unchanged.
pub fn classify_invoke_failure(error: ProviderError, model: &str) -> ProviderError {
    let restricted = error.vendor_message().is_some_and(|message| {
        let message = message.to_lowercase();
        ON_DEMAND_UNSUPPORTED_MARKERS
            .iter()
            .any(|marker| message.contains(marker))
    });
    if restricted {
        ProviderError::on_demand_unsupported(model)
    } else {
        error
    }
}

/// Pull a human readable message out of a vendor error body.
///
/// Understands `{"error": {"message": ..}}`, `{"message": ..}` and
/// `{"Message": ..}`; anything else is returned trimmed.
pub fn extract_error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|value| {
        value
            .pointer("/error/message")
            .or_else(|| value.get("message"))
            .or_else(|| value.get("Message"))
            .and_then(|message| message.as_str())
            .map(str::to_string)
    });
    message.unwrap_or_else(|| body.trim().to_string())
}
