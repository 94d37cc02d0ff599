//! Model infrastructure module
//!
//! Provider adapters that list and invoke models on each backend.
//!
//! # Structure
//! - `types` - Completion and error types, on-demand classification
//! - `traits` - the `ModelProvider` adapter trait
//! - `adapter` - request envelopes and response unwrapping per API format
//! - `factory` - builds every adapter from `AppConfig`
//! - `clients` - individual client implementations

pub mod adapter;
pub mod clients;
pub mod factory;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use factory::ProviderFactory;
pub use traits::ModelProvider;
pub use types::{Completion, ProviderError, classify_invoke_failure};
