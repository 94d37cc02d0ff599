pub mod app;
pub mod error;
pub mod loader;
pub mod provider;

pub use app::{AppConfig, GenerationSettings};
pub use error::ConfigError;
pub use provider::{BedrockConfig, HttpProviderConfig, JumpStartConfig};
