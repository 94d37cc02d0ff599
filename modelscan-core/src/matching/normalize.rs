//! Name normalizer
//!
//! Turns vendor identifiers such as `meta-llama/Llama-3.1-70B-Instruct` and
//! human names such as `Llama 3.1 70B Instruct` into the same space-separated
//! token string so they can be compared.

const SEPARATORS: [char; 5] = ['-', '_', '/', '.', ':'];

/// Removed wherever they occur. `models` must precede `model`.
const NOISE: [&str; 8] = [
    "models",
    "model",
    "meta",
    "together",
    "openai",
    "bedrock",
    "gemini",
    "anthropic",
];

/// Family and variant keywords that are split off from adjacent text.
const KEYWORDS: [&str; 9] = [
    "llama", "instruct", "turbo", "pro", "flash", "haiku", "sonnet", "chatgpt", "claude",
];

const PHRASES: [(&str, &str); 1] = [("gpt oss", "gpt-oss")];

const VERSION_REPAIRS: [(&str, &str); 3] = [(" 3 5 ", " 3.5 "), (" 3 1 ", " 3.1 "), (" 3 3 ", " 3.3 ")];

/// Normalize a raw model name into its comparable token form.
pub fn normalize(name: &str) -> String {
    let mut text: String = name
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, '\'' | '’'))
        .map(|c| if SEPARATORS.contains(&c) { ' ' } else { c })
        .collect();

    // a removal can splice any noise word back together, so repeat whole
    // passes until one changes nothing
    loop {
        let before = text.len();
        for noise in NOISE {
            text = text.replace(noise, "");
        }
        if text.len() == before {
            break;
        }
    }

    for keyword in KEYWORDS {
        text = text.replace(keyword, &format!(" {keyword} "));
    }

    let mut text = collapse_whitespace(&text);
    for (phrase, token) in PHRASES {
        text = text.replace(phrase, token);
    }

    repair_versions(&text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn repair_versions(text: &str) -> String {
    let mut padded = format!(" {text} ");
    for (broken, fixed) in VERSION_REPAIRS {
        padded = padded.replace(broken, fixed);
    }
    padded.trim().to_string()
}
