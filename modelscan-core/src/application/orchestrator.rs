//! Multi-provider orchestrator
//!
//! Runs the three phases of a benchmark pass strictly in sequence:
//!
//! 1. [`Orchestrator::discover`] asks every ready provider for its models.
//! 2. [`Orchestrator::match_catalog`] binds each requested name to the first
//!    provider, in provider order, whose listing fuzzy-matches it.
//! 3. [`Orchestrator::run_all`] executes every query against every entry,
//!    turning each outcome into a [`RunRecord`] and pausing between calls.
//!
//! A failing call never aborts the pass; it becomes a failed record.

use std::time::Duration;
use tracing::{debug, info, warn};

use super::report;
use crate::constants::{DEFAULT_PACING_MS, PREVIEW_LIMIT, PREVIEW_MARKER};
use crate::domain::types::{Availability, CatalogEntry, RunRecord};
use crate::infrastructure::model::ModelProvider;
use crate::matching::{best_match, normalize};

/// Fixed client-side delay applied after every (entry, query) call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    delay: Duration,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// No pause between calls.
    pub fn none() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_PACING_MS))
    }
}

pub struct Orchestrator {
    providers: Vec<Box<dyn ModelProvider>>,
    pacer: Pacer,
}

impl Orchestrator {
    /// Provider order is significant: it is both the discovery order and the
    /// precedence order when several providers match the same name.
    pub fn new(providers: Vec<Box<dyn ModelProvider>>, pacer: Pacer) -> Self {
        Self { providers, pacer }
    }

    pub fn providers(&self) -> &[Box<dyn ModelProvider>] {
        &self.providers
    }

    fn provider(&self, id: &str) -> Option<&dyn ModelProvider> {
        self.providers
            .iter()
            .find(|provider| provider.id() == id)
            .map(Box::as_ref)
    }

    /// Listing per provider; not-ready providers get an empty list.
    pub async fn discover(&self) -> Availability {
        let mut available = Availability::new();
        for provider in &self.providers {
            let id = provider.id();
            if provider.is_ready() {
                let models = provider.list_models().await;
                info!(
                    provider = id,
                    models = models.len(),
                    "{}",
                    report::discovery_line(id, Some(models.len()))
                );
                available.insert(id, models);
            } else {
                info!(provider = id, "{}", report::discovery_line(id, None));
                available.insert(id, Vec::new());
            }
        }
        available
    }

    /// One entry per requested name that some provider lists; the first
    /// provider in availability order wins.
    pub fn match_catalog(
        &self,
        requested: &[String],
        available: &Availability,
    ) -> Vec<CatalogEntry> {
        let mut entries = Vec::new();
        for name in requested {
            let found = available.iter().find_map(|(provider, models)| {
                best_match(name, models).map(|model| (provider, model))
            });
            match found {
                Some((provider, model)) => {
                    debug!(
                        requested = name.as_str(),
                        provider,
                        model = model.as_str(),
                        "Matched model"
                    );
                    entries.push(
                        CatalogEntry::new(name.as_str(), provider, model.as_str())
                            .with_meta("family", provider)
                            .with_meta("normalized", normalize(name)),
                    );
                }
                None => {
                    warn!(requested = name.as_str(), "Model '{name}' not found in any provider.")
                }
            }
        }
        entries
    }

    /// Every query against every entry, in input order.
    pub async fn run_all(
        &self,
        entries: &[CatalogEntry],
        queries: &[String],
    ) -> Vec<RunRecord> {
        let total = entries.len() * queries.len();
        let mut records = Vec::with_capacity(total);

        for entry in entries {
            let provider = self.provider(&entry.provider);
            for query in queries {
                info!(
                    provider = entry.provider.as_str(),
                    model = entry.provider_model_id.as_str(),
                    progress = format!("{}/{total}", records.len() + 1),
                    "Running :: {}",
                    query_label(query)
                );
                let record = execute(provider, entry, query).await;
                if record.ok {
                    info!("{}", report::outcome(&record));
                } else {
                    warn!("{}", report::outcome(&record));
                }
                records.push(record);
                self.pacer.pause().await;
            }
        }
        records
    }
}

async fn execute(
    provider: Option<&dyn ModelProvider>,
    entry: &CatalogEntry,
    query: &str,
) -> RunRecord {
    let Some(provider) = provider else {
        return RunRecord::failure(
            entry,
            query,
            format!("provider '{}' is not registered", entry.provider),
        );
    };
    match provider.run(query, &entry.provider_model_id).await {
        Ok(completion) => RunRecord::success(
            entry,
            query,
            completion.elapsed.as_secs_f64(),
            preview(&completion.text),
        ),
        Err(err) if err.is_on_demand_unsupported() => {
            debug!(
                model = entry.provider_model_id.as_str(),
                "On-demand invocation unsupported"
            );
            RunRecord::failure(entry, query, err.to_string())
        }
        Err(err) => RunRecord::failure(entry, query, err.to_string()),
    }
}

/// Response preview: trimmed, line breaks flattened, at most
/// `PREVIEW_LIMIT` characters plus the marker.
pub fn preview(text: &str) -> String {
    let flat: String = text
        .trim()
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    if flat.chars().count() <= PREVIEW_LIMIT {
        return flat;
    }
    let mut truncated: String = flat.chars().take(PREVIEW_LIMIT).collect();
    truncated.push(PREVIEW_MARKER);
    truncated
}

fn query_label(query: &str) -> String {
    const LABEL_CHARS: usize = 48;
    if query.chars().count() <= LABEL_CHARS {
        query.to_string()
    } else {
        let mut label: String = query.chars().take(LABEL_CHARS).collect();
        label.push(PREVIEW_MARKER);
        label
    }
}
