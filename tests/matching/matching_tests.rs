// Matching tests - normalizer properties and fuzzy resolution against
// provider-shaped identifiers

use modelscan_core::{best_match, normalize};

const NAMES: &[&str] = &[
    "",
    "Llama 3.1 70B Instruct",
    "meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo",
    "anthropic.claude-3-haiku-20240307-v1:0",
    "us.anthropic.claude-3-5-sonnet-20240620-v1:0",
    "models/gemini-2.0-flash",
    "openai/gpt-oss-20b",
    "GPT OSS 120B",
    "ChatGPT-4o-latest",
    "Qwen2.5-72B-Instruct-Turbo",
    "O'Reilly’s Model",
    "modmodelel",
    "3.1.2 3 3 3",
];

#[test]
fn normalization_is_idempotent() {
    for name in NAMES {
        let once = normalize(name);
        assert_eq!(normalize(&once), once, "input: {name:?}");
    }
}

#[test]
fn vendor_spellings_converge() {
    assert_eq!(normalize("Gemini 1.5 Pro"), normalize("models/gemini-1.5-pro"));
    assert_eq!(normalize("GPT OSS 120B"), normalize("openai/gpt-oss-120b"));
    assert_eq!(normalize("GPT OSS 120B"), "gpt-oss 120b");
}

#[test]
fn exact_match_wins_over_earlier_scoring_candidate() {
    let candidates = ["gpt-4o-2024-08-06", "openai/gpt-4o", "gpt-4o"];
    assert_eq!(best_match("GPT-4o", &candidates), Some(&"openai/gpt-4o"));
}

#[test]
fn token_overlap_meets_threshold() {
    let candidates = ["llama-3.1-70b-instruct-v2", "gpt-4-turbo"];
    assert_eq!(
        best_match("Llama 3.1 70B Instruct", &candidates),
        Some(&"llama-3.1-70b-instruct-v2")
    );
}

#[test]
fn unrelated_names_are_rejected() {
    let candidates = ["gpt-4-turbo", "llama-3-8b"];
    assert_eq!(best_match("Obscure Model X", &candidates), None);
    assert_eq!(best_match("Llama 3.1 8B Instruct", &["gpt-4o"]), None);
}

#[test]
fn substring_fallback_resolves_short_names() {
    let candidates = ["anthropic.claude-3-sonnet-v1"];
    assert_eq!(
        best_match("claude", &candidates),
        Some(&"anthropic.claude-3-sonnet-v1")
    );
}

#[test]
fn provider_listings_resolve_requested_names() {
    let bedrock = [
        "anthropic.claude-3-5-sonnet-20240620-v1:0",
        "anthropic.claude-3-haiku-20240307-v1:0",
    ];
    assert_eq!(best_match("Claude 3.5 Sonnet", &bedrock), Some(&bedrock[0]));

    let together = [
        "meta-llama/meta-llama-3.1-8b-instruct-turbo",
        "meta-llama/llama-3.3-70b-instruct-turbo",
    ];
    assert_eq!(best_match("Llama 3.1 8B Instruct", &together), Some(&together[0]));

    let gemini = ["models/gemini-1.5-flash", "models/gemini-1.5-pro"];
    assert_eq!(best_match("Gemini 1.5 Pro", &gemini), Some(&gemini[1]));

    let jumpstart = ["openai/gpt-oss-20b", "openai/gpt-oss-120b"];
    assert_eq!(best_match("GPT OSS 120B", &jumpstart), Some(&jumpstart[1]));
}

#[test]
fn owned_candidates_are_returned_unmodified() {
    let candidates = vec!["Models/Gemini-1.5-Pro".to_string()];
    let matched = best_match("gemini 1.5 pro", &candidates).expect("match");
    assert_eq!(matched, "Models/Gemini-1.5-Pro");
}
