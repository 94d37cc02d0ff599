//! Model clients

mod base;
mod bedrock;
mod gemini;
mod jumpstart;
mod openai;
mod signed;
#[cfg(test)]
mod stub;
mod together;

pub use base::HttpClientBase;
pub use bedrock::{BEDROCK_ID, BedrockClient};
pub use gemini::{GEMINI_ID, GeminiClient};
pub use jumpstart::{JUMPSTART_ID, JumpStartClient, pick_instance};
pub use openai::{OPENAI_ID, OpenAIClient};
pub use signed::{RawResponse, SignedClient};
pub use together::{TOGETHER_ID, TogetherClient};
