//! Model traits

use super::types::{Completion, ProviderError};
use async_trait::async_trait;

/// Uniform capability set over heterogeneous model backends.
#[async_trait]
pub trait ModelProvider: Send + Sync {
    /// Provider identifier used in catalog entries and run records
    fn id(&self) -> &str;

    /// Whether credentials and configuration are present. Never performs I/O.
    fn is_ready(&self) -> bool;

    /// Lowercase model identifiers visible to this provider.
    ///
    /// Returns an empty list when not ready or when listing fails.
    async fn list_models(&self) -> Vec<String>;

    /// Run one prompt; `Completion::elapsed` covers the inference call only.
    async fn run(&self, prompt: &str, model_id: &str) -> Result<Completion, ProviderError>;
}
