//! Payload adapters - build request envelopes and unwrap responses for each
//! API format

use crate::config::GenerationSettings;
use serde_json::{Value, json};

/// Region prefixes used by Bedrock cross-region inference profiles
const BEDROCK_REGION_PREFIXES: [&str; 5] = ["us", "eu", "apac", "us-gov", "global"];

/// Adapter for converting a single prompt to different API formats
pub struct PayloadAdapter;

impl PayloadAdapter {
    /// OpenAI-style chat completion body
    /// Returns: {"model", "messages": [{"role": "user", "content"}], ...}
    pub fn to_chat_completion(model: &str, prompt: &str, settings: GenerationSettings) -> Value {
        json!({
            "model": model,
            "messages": [{"role": "user", "content": prompt}],
            "max_tokens": settings.max_tokens,
            "temperature": settings.temperature,
            "stream": false
        })
    }

    /// Gemini generateContent body
    pub fn to_gemini(prompt: &str, settings: GenerationSettings) -> Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{"text": prompt}]
            }],
            "generationConfig": {
                "maxOutputTokens": settings.max_tokens,
                "temperature": settings.temperature
            }
        })
    }

    /// Bedrock InvokeModel body; Anthropic models use the messages API,
    /// every other family gets the plain text envelope.
    pub fn to_bedrock(model_id: &str, prompt: &str, settings: GenerationSettings) -> Value {
        if bedrock_family(model_id) == "anthropic" {
            json!({
                "anthropic_version": "bedrock-2023-05-31",
                "max_tokens": settings.max_tokens,
                "messages": [{
                    "role": "user",
                    "content": [{"type": "text", "text": prompt}]
                }]
            })
        } else {
            json!({ "inputText": prompt })
        }
    }

    /// SageMaker text-generation container body
    pub fn to_text_generation(prompt: &str, settings: GenerationSettings) -> Value {
        json!({
            "inputs": prompt,
            "parameters": {"max_new_tokens": settings.max_tokens}
        })
    }

    /// Text of a Gemini response.
    ///
    /// Uses the parts of the first candidate; when those carry no text, the
    /// text parts of every candidate are joined with newlines.
    pub fn gemini_text(response: &Value) -> String {
        let candidates = response
            .get("candidates")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        let first: String = candidates
            .first()
            .map(|candidate| candidate_parts(candidate).concat())
            .unwrap_or_default();
        if !first.is_empty() {
            return first;
        }

        candidates
            .iter()
            .flat_map(candidate_parts)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Text of an Anthropic-on-Bedrock response, or `None` when the body has
    /// no recognisable shape.
    pub fn anthropic_text(body: &str) -> Option<String> {
        let parsed: Value = serde_json::from_str(body).ok()?;
        let content = parsed
            .pointer("/output/message/content")
            .or_else(|| parsed.get("content"))
            .and_then(Value::as_array)?;

        let parts: Vec<&str> = content
            .iter()
            .filter(|part| part.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect();
        Some(parts.join("\n").trim().to_string())
    }
}

fn candidate_parts(candidate: &Value) -> Vec<&str> {
    candidate
        .pointer("/content/parts")
        .and_then(Value::as_array)
        .map(|parts| {
            parts
                .iter()
                .filter_map(|part| part.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

/// Vendor family of a Bedrock model id (`anthropic` for
/// `us.anthropic.claude-3-haiku-20240307-v1:0`).
pub fn bedrock_family(model_id: &str) -> &str {
    let mut segments = model_id.split('.');
    let first = segments.next().unwrap_or_default();
    if BEDROCK_REGION_PREFIXES.contains(&first) {
        segments.next().unwrap_or(first)
    } else {
        first
    }
}
