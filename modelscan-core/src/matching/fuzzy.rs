//! Fuzzy matcher
//!
//! Resolution order: exact normalized match, then token-overlap scoring with
//! a minimum score, then substring containment.

use std::collections::HashSet;

use super::normalize::normalize;

/// Minimum overlap required regardless of how short the requested name is.
const MIN_OVERLAP: usize = 2;

/// Return the candidate that best matches `requested`, unmodified.
pub fn best_match<'a, S: AsRef<str>>(requested: &str, candidates: &'a [S]) -> Option<&'a S> {
    let target = normalize(requested);
    let normalized: Vec<String> = candidates
        .iter()
        .map(|candidate| normalize(candidate.as_ref()))
        .collect();

    if let Some(index) = normalized.iter().position(|form| *form == target) {
        return Some(&candidates[index]);
    }

    let target_tokens = tokens(&target);
    let mut best: Option<(usize, usize)> = None;
    for (index, form) in normalized.iter().enumerate() {
        let score = tokens(form).intersection(&target_tokens).count();
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }

    let threshold = MIN_OVERLAP.max(target_tokens.len() / 2);
    if let Some((index, score)) = best
        && score >= threshold
    {
        return Some(&candidates[index]);
    }

    if target.is_empty() {
        return None;
    }
    normalized
        .iter()
        .position(|form| {
            !form.is_empty() && (target.contains(form.as_str()) || form.contains(&target))
        })
        .map(|index| &candidates[index])
}

fn tokens(form: &str) -> HashSet<&str> {
    form.split(' ').filter(|token| !token.is_empty()).collect()
}
