//! AWS support for the Bedrock and SageMaker clients
//!
//! - `credentials` - resolves credentials from the standard AWS variables
//! - `sigv4` - Signature Version 4 request signing

pub mod credentials;
pub mod sigv4;

pub use credentials::{AwsAuth, AwsCredentials};
pub use sigv4::{SignedHeaders, SigningError, sign_request};
