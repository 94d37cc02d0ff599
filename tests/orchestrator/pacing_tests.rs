// Pacing tests - virtual time checks for the fixed inter-call delay

#[path = "../support/mod.rs"]
mod support;

use modelscan_core::types::CatalogEntry;
use modelscan_core::{Orchestrator, Pacer};
use std::time::Duration;
use support::{Reply, ScriptedProvider, names};
use tokio::time::Instant;

fn entries() -> Vec<CatalogEntry> {
    vec![
        CatalogEntry::new("GPT 4o", "openai", "gpt-4o"),
        CatalogEntry::new("GPT 4o Mini", "openai", "gpt-4o-mini"),
    ]
}

#[tokio::test(start_paused = true)]
async fn pause_follows_every_call() {
    let provider = ScriptedProvider::new("openai", &[]).with_replies(vec![
        Reply::Text("a".into()),
        Reply::Fail("b".into()),
        Reply::OnDemandUnsupported,
    ]);
    let orchestrator = Orchestrator::new(
        vec![provider.boxed()],
        Pacer::new(Duration::from_millis(250)),
    );

    let started = Instant::now();
    let records = orchestrator.run_all(&entries(), &names(&["q1", "q2"])).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 4);
    assert!(elapsed >= Duration::from_millis(1000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(1250), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn no_pacer_means_no_waiting() {
    let orchestrator = Orchestrator::new(
        vec![ScriptedProvider::new("openai", &[]).boxed()],
        Pacer::none(),
    );
    let started = Instant::now();
    orchestrator.run_all(&entries(), &names(&["q1", "q2"])).await;
    assert_eq!(started.elapsed(), Duration::ZERO);
}
