//! Console report lines
//!
//! Pure formatters; callers decide where the lines go. The orchestrator logs
//! discovery and per-call lines as it works, the binary logs the match
//! listing and the closing summary.

use crate::domain::types::{CatalogEntry, RunRecord};

const RULE_WIDTH: usize = 50;

/// `openai: 42 models visible` or `bedrock: not configured`.
pub fn discovery_line(provider: &str, models: Option<usize>) -> String {
    match models {
        Some(count) => format!("{provider}: {count} models visible"),
        None => format!("{provider}: not configured"),
    }
}

/// Header plus one numbered line per catalog entry.
pub fn matches(entries: &[CatalogEntry]) -> Vec<String> {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push("=== Top Matches ===".to_string());
    lines.extend(entries.iter().enumerate().map(|(index, entry)| {
        format!(
            "{:2}. [{}] {} -> {}",
            index + 1,
            entry.provider,
            entry.canonical_name,
            entry.provider_model_id
        )
    }));
    lines
}

pub fn outcome(record: &RunRecord) -> String {
    let label = format!("{}:{}", record.provider, record.canonical_name);
    if record.ok {
        format!(
            "{label} [{:.2}s] {}",
            record.response_time.unwrap_or_default(),
            record.response_preview.as_deref().unwrap_or_default()
        )
    } else {
        format!(
            "{label} ERROR: {}",
            record.error.as_deref().unwrap_or("unknown error")
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderTally {
    pub provider: String,
    pub ok: usize,
    pub total: usize,
}

/// Success counts overall and per provider, providers in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub total: usize,
    pub per_provider: Vec<ProviderTally>,
}

impl Tally {
    pub fn from_records(records: &[RunRecord]) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.total += 1;
            tally.ok += usize::from(record.ok);

            let position = tally
                .per_provider
                .iter()
                .position(|entry| entry.provider == record.provider);
            let entry = match position {
                Some(index) => &mut tally.per_provider[index],
                None => {
                    tally.per_provider.push(ProviderTally {
                        provider: record.provider.clone(),
                        ok: 0,
                        total: 0,
                    });
                    let last = tally.per_provider.len() - 1;
                    &mut tally.per_provider[last]
                }
            };
            entry.total += 1;
            entry.ok += usize::from(record.ok);
        }
        tally
    }
}

pub fn summary(tally: &Tally) -> Vec<String> {
    let mut lines = vec![
        "=".repeat(RULE_WIDTH),
        format!("Done. {}/{} successful.", tally.ok, tally.total),
    ];
    lines.extend(
        tally
            .per_provider
            .iter()
            .map(|entry| format!("{:10}: {}/{} ok", entry.provider, entry.ok, entry.total)),
    );
    lines
}
