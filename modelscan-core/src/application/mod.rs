//! Application layer: discovery, matching and execution over the provider
//! adapters, plus the console report and the requested-models loader.

pub mod orchestrator;
pub mod report;
pub mod requested;
