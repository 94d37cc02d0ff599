use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use modelscan_core::AppConfig;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "modelscan",
    version,
    about = "Match requested model names against provider catalogs and benchmark them"
)]
pub struct Cli {
    /// Configuration file (defaults to config/modelscan.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Requested models JSON file; overrides MODELS_JSON and the config
    #[arg(long)]
    pub models: Option<PathBuf>,
    /// Query to run against every matched model; repeat for several
    #[arg(long = "query")]
    pub queries: Vec<String>,
    /// Pause after every call, in milliseconds
    #[arg(long)]
    pub pacing_ms: Option<u64>,
}

impl Cli {
    /// Flags win over the config file and the environment.
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(models) = &self.models {
            info!(path = %models.display(), "Using requested models file from CLI flag");
            config.models_file = models.clone();
        }

        let queries: Vec<String> = self
            .queries
            .iter()
            .map(|query| query.trim())
            .filter(|query| !query.is_empty())
            .map(str::to_string)
            .collect();
        if !queries.is_empty() {
            info!(count = queries.len(), "Using queries from CLI flags");
            config.queries = queries;
        }

        if let Some(pacing_ms) = self.pacing_ms {
            config.pacing = Duration::from_millis(pacing_ms);
        }
    }
}
