//! Model catalog matching and multi-provider benchmark orchestration.
//!
//! The crate reconciles human-friendly model names with the identifiers each
//! provider exposes, then fans a fixed set of prompts across the matched
//! models and records one [`RunRecord`](domain::types::RunRecord) per call.
//!
//! # Structure
//! - `matching` - name normalization and fuzzy matching
//! - `infrastructure::model` - provider contract and HTTP clients
//! - `infrastructure::aws` - credentials and SigV4 signing
//! - `application` - orchestrator, report, requested-models loader
//! - `config` - TOML + environment configuration

pub mod application;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod matching;

pub use application::orchestrator::{Orchestrator, Pacer};
pub use application::{report, requested};
pub use config::{AppConfig, ConfigError};
pub use domain::types;
pub use infrastructure::model;
pub use matching::{best_match, normalize};
