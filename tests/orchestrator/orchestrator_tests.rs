// Orchestrator tests - discovery, matching precedence and per-call isolation
// driven by scripted providers

#[path = "../support/mod.rs"]
mod support;

use modelscan_core::model::{ProviderError, classify_invoke_failure};
use modelscan_core::types::CatalogEntry;
use modelscan_core::{Orchestrator, Pacer};
use support::{Reply, ScriptedProvider, names};

#[tokio::test]
async fn discovery_follows_provider_order() {
    let orchestrator = Orchestrator::new(
        vec![
            ScriptedProvider::new("together", &["meta-llama/llama-3.3-70b-instruct-turbo"]).boxed(),
            ScriptedProvider::new("openai", &["gpt-4o", "gpt-4o-mini"]).boxed(),
            ScriptedProvider::new("bedrock", &["amazon.titan-text-express-v1"])
                .not_ready()
                .boxed(),
        ],
        Pacer::none(),
    );

    let available = orchestrator.discover().await;
    let order: Vec<&str> = available.iter().map(|(provider, _)| provider).collect();
    assert_eq!(order, vec!["together", "openai", "bedrock"]);
    assert_eq!(available.get("openai").map(<[String]>::len), Some(2));
    assert_eq!(available.get("bedrock").map(<[String]>::len), Some(0));
}

#[tokio::test]
async fn not_ready_provider_is_never_listed_or_matched() {
    let hidden = ScriptedProvider::new("openai", &["gpt-4o"]).not_ready();
    let calls = hidden.calls();
    let orchestrator = Orchestrator::new(vec![hidden.boxed()], Pacer::none());

    let available = orchestrator.discover().await;
    assert_eq!(calls.listings(), 0);
    assert_eq!(available.get("openai"), Some(&[][..]));

    let entries = orchestrator.match_catalog(&names(&["GPT 4o"]), &available);
    assert!(entries.is_empty());
}

#[tokio::test]
async fn first_provider_in_order_wins_each_name() {
    let orchestrator = Orchestrator::new(
        vec![
            ScriptedProvider::new("openai", &["gpt-4o"]).boxed(),
            ScriptedProvider::new("together", &["openai/gpt-4o", "meta-llama/llama-3.3-70b-instruct-turbo"])
                .boxed(),
        ],
        Pacer::none(),
    );
    let available = orchestrator.discover().await;
    let requested = names(&["Llama 3.3 70B Instruct Turbo", "GPT 4o", "Obscure Model X"]);
    let entries = orchestrator.match_catalog(&requested, &available);

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].canonical_name, "Llama 3.3 70B Instruct Turbo");
    assert_eq!(entries[0].provider, "together");
    assert_eq!(entries[0].provider_model_id, "meta-llama/llama-3.3-70b-instruct-turbo");
    assert_eq!(entries[1].provider, "openai");
    assert_eq!(entries[1].provider_model_id, "gpt-4o");
    assert_eq!(entries[1].meta.get("normalized").map(String::as_str), Some("gpt 4o"));
    assert_eq!(entries[1].meta.get("family").map(String::as_str), Some("openai"));
}

#[tokio::test]
async fn failing_call_does_not_affect_other_records() {
    let openai = ScriptedProvider::new("openai", &["gpt-4o", "gpt-4o-mini"]).with_replies(vec![
        Reply::Text("first answer".into()),
        Reply::Fail("upstream exploded".into()),
        Reply::Text("third answer".into()),
        Reply::Text("fourth answer".into()),
    ]);
    let calls = openai.calls();
    let orchestrator = Orchestrator::new(vec![openai.boxed()], Pacer::none());

    let entries = vec![
        CatalogEntry::new("GPT 4o", "openai", "gpt-4o"),
        CatalogEntry::new("GPT 4o Mini", "openai", "gpt-4o-mini"),
    ];
    let queries = names(&["q1", "q2"]);
    let records = orchestrator.run_all(&entries, &queries).await;

    assert_eq!(records.len(), 4);
    let outcomes: Vec<(&str, &str, bool)> = records
        .iter()
        .map(|r| (r.model_id.as_str(), r.query.as_str(), r.ok))
        .collect();
    assert_eq!(
        outcomes,
        vec![
            ("gpt-4o", "q1", true),
            ("gpt-4o", "q2", false),
            ("gpt-4o-mini", "q1", true),
            ("gpt-4o-mini", "q2", true),
        ]
    );
    assert_eq!(
        records[1].error.as_deref(),
        Some("provider 'openai' returned 500: upstream exploded")
    );
    assert!(records[1].response_time.is_none());
    assert_eq!(records[2].response_preview.as_deref(), Some("third answer"));
    assert_eq!(records[0].response_time, Some(1.5));
    assert_eq!(calls.runs().len(), 4);
    assert_eq!(calls.runs()[1], ("gpt-4o".to_string(), "q2".to_string()));
}

#[tokio::test]
async fn long_responses_are_truncated_in_preview() {
    let provider = ScriptedProvider::new("together", &["m"])
        .with_replies(vec![Reply::Text(format!("{}\n", "x".repeat(300)))]);
    let orchestrator = Orchestrator::new(vec![provider.boxed()], Pacer::none());

    let records = orchestrator
        .run_all(&[CatalogEntry::new("M", "together", "m")], &names(&["q"]))
        .await;
    let preview = records[0].response_preview.as_deref().expect("preview");
    assert_eq!(preview.chars().count(), 241);
    assert!(preview.ends_with('…'));
    assert!(preview.starts_with(&"x".repeat(240)));
}

#[tokio::test]
async fn on_demand_restriction_becomes_failed_record() {
    let provider = ScriptedProvider::new("bedrock", &["meta.llama3-1-70b-instruct-v1:0"])
        .with_replies(vec![Reply::OnDemandUnsupported, Reply::Text("fine".into())]);
    let orchestrator = Orchestrator::new(vec![provider.boxed()], Pacer::none());

    let entries = vec![CatalogEntry::new(
        "Llama 3.1 70B Instruct",
        "bedrock",
        "meta.llama3-1-70b-instruct-v1:0",
    )];
    let records = orchestrator.run_all(&entries, &names(&["q1", "q2"])).await;

    assert!(!records[0].ok);
    assert_eq!(
        records[0].error.as_deref(),
        Some("On-demand not supported for meta.llama3-1-70b-instruct-v1:0")
    );
    assert!(records[0].response_time.is_none());
    assert!(records[1].ok);
}

#[test]
fn vendor_wording_is_classified_as_on_demand() {
    let error = ProviderError::api(
        "bedrock",
        400,
        "Invocation of model ID meta.llama3-1-70b-instruct-v1:0 with on-demand throughput isn’t supported.",
    );
    assert!(classify_invoke_failure(error, "meta.llama3-1-70b-instruct-v1:0").is_on_demand_unsupported());
}

#[tokio::test]
async fn entry_for_unknown_provider_fails_alone() {
    let orchestrator = Orchestrator::new(
        vec![ScriptedProvider::new("openai", &["gpt-4o"]).boxed()],
        Pacer::none(),
    );
    let entries = vec![
        CatalogEntry::new("Ghost", "ghost", "ghost-1"),
        CatalogEntry::new("GPT 4o", "openai", "gpt-4o"),
    ];
    let records = orchestrator.run_all(&entries, &names(&["q"])).await;

    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].error.as_deref(),
        Some("provider 'ghost' is not registered")
    );
    assert!(records[1].ok);
}

#[tokio::test]
async fn records_serialize_as_json_lines() {
    let orchestrator = Orchestrator::new(
        vec![ScriptedProvider::new("openai", &["gpt-4o"]).boxed()],
        Pacer::none(),
    );
    let records = orchestrator
        .run_all(&[CatalogEntry::new("GPT 4o", "openai", "gpt-4o")], &names(&["q"]))
        .await;
    let line = serde_json::to_string(&records[0]).expect("json");
    assert!(!line.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&line).expect("parse");
    assert_eq!(value["provider"], "openai");
    assert_eq!(value["ok"], true);
    assert_eq!(value["response_preview"], "gpt-4o says hi");
    assert!(value["error"].is_null());
}

#[tokio::test]
async fn nothing_to_run_yields_no_records() {
    let orchestrator = Orchestrator::new(
        vec![ScriptedProvider::new("openai", &["gpt-4o"]).boxed()],
        Pacer::none(),
    );
    assert!(orchestrator.run_all(&[], &names(&["q"])).await.is_empty());
    let entries = vec![CatalogEntry::new("GPT 4o", "openai", "gpt-4o")];
    assert!(orchestrator.run_all(&entries, &[]).await.is_empty());
}
