mod cli;

use clap::Parser;
use cli::Cli;
use modelscan_core::model::ProviderFactory;
use modelscan_core::report::{self, Tally};
use modelscan_core::requested::load_requested;
use modelscan_core::{AppConfig, Orchestrator, Pacer};
use std::error::Error;
use std::io::{self, Write};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let cli = Cli::parse();
    debug!(config = ?cli.config, models = ?cli.models, "CLI arguments parsed");

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);

    let requested = load_requested(&config.models_file)?;
    info!(
        path = %config.models_file.display(),
        count = requested.len(),
        queries = config.queries.len(),
        "Loaded requested models"
    );

    let orchestrator = Orchestrator::new(
        ProviderFactory::create_all(&config),
        Pacer::new(config.pacing),
    );

    let available = orchestrator.discover().await;
    let entries = orchestrator.match_catalog(&requested, &available);
    for line in report::matches(&entries) {
        info!("{line}");
    }

    let records = orchestrator.run_all(&entries, &config.queries).await;
    for line in report::summary(&Tally::from_records(&records)) {
        info!("{line}");
    }

    let mut out = io::stdout().lock();
    for record in &records {
        writeln!(out, "{}", serde_json::to_string(record)?)?;
    }
    Ok(())
}

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_level(true)
            .with_writer(io::stderr)
            .init();
    });
}
