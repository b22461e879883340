//! Autocomplete suggestion construction.
//!
//! Suggestions are derived from the record's title and popularity alone,
//! so the suggestion list can always be rebuilt from the current record
//! without consulting the index.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An autocomplete candidate with its ranking weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionEntry {
    /// Suggestion input text
    pub input: String,
    /// Ranking weight (the record's normalized popularity)
    pub weight: i64,
}

/// Construct suggestion inputs and weights from a title and popularity.
///
/// Titles split into whitespace tokens; for each length `i` in
/// `0..min(3, token_count)` every distinct ordering of `i` tokens becomes
/// one input, joined with single spaces. Duplicate inputs are dropped,
/// keeping generation order. Every entry's weight is the popularity,
/// defaulted to 1 when absent or zero.
///
/// The upper bound is exclusive: full-length orderings are never emitted
/// for one- and two-token titles, so a single-token title yields only the
/// empty input. Callers depend on this boundary as-is; changing it would
/// silently change what is indexed.
pub fn construct_suggest(title: Option<&str>, popularity: Option<i64>) -> Vec<SuggestionEntry> {
    let title = title.unwrap_or("");
    let weight = match popularity {
        Some(p) if p != 0 => p,
        _ => 1,
    };

    let tokens: Vec<&str> = title.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut seen: HashSet<String> = HashSet::new();
    let mut entries = Vec::new();

    for len in 0..tokens.len().min(3) {
        let mut current: Vec<&str> = Vec::with_capacity(len);
        let mut used = vec![false; tokens.len()];
        let mut inputs = Vec::new();
        collect_orderings(&tokens, len, &mut current, &mut used, &mut inputs);

        for input in inputs {
            if seen.insert(input.clone()) {
                entries.push(SuggestionEntry { input, weight });
            }
        }
    }

    entries
}

/// Emit every ordering of `len` distinct tokens, first-token-major order.
fn collect_orderings<'a>(
    tokens: &[&'a str],
    len: usize,
    current: &mut Vec<&'a str>,
    used: &mut [bool],
    out: &mut Vec<String>,
) {
    if current.len() == len {
        out.push(current.join(" "));
        return;
    }
    for i in 0..tokens.len() {
        if used[i] {
            continue;
        }
        used[i] = true;
        current.push(tokens[i]);
        collect_orderings(tokens, len, current, used, out);
        current.pop();
        used[i] = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(entries: &[SuggestionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.input.as_str()).collect()
    }

    #[test]
    fn test_empty_title() {
        assert!(construct_suggest(Some(""), Some(5)).is_empty());
    }

    #[test]
    fn test_absent_title_and_popularity() {
        assert!(construct_suggest(None, None).is_empty());
    }

    #[test]
    fn test_whitespace_only_title() {
        assert!(construct_suggest(Some("   \t "), Some(2)).is_empty());
    }

    #[test]
    fn test_single_token_yields_only_empty_input() {
        // length range is 0..min(3, 1), so only the zero-length ordering
        let entries = construct_suggest(Some("Alpha"), None);
        assert_eq!(entries, vec![SuggestionEntry { input: String::new(), weight: 1 }]);
    }

    #[test]
    fn test_two_tokens() {
        let entries = construct_suggest(Some("Alpha Beta"), Some(3));
        assert_eq!(inputs(&entries), vec!["", "Alpha", "Beta"]);
        assert!(entries.iter().all(|e| e.weight == 3));
    }

    #[test]
    fn test_three_tokens_stops_before_full_length() {
        let entries = construct_suggest(Some("one two three"), Some(1));
        let got = inputs(&entries);

        // lengths 0, 1, 2: 1 + 3 + 6 orderings
        assert_eq!(got.len(), 10);
        assert!(got.contains(&""));
        assert!(got.contains(&"one"));
        assert!(got.contains(&"two three"));
        assert!(got.contains(&"three one"));
        assert!(!got.iter().any(|s| s.split_whitespace().count() == 3));
    }

    #[test]
    fn test_four_tokens_capped_at_length_two() {
        let entries = construct_suggest(Some("a b c d"), Some(1));
        assert!(entries
            .iter()
            .all(|e| e.input.split_whitespace().count() <= 2));
        // 1 empty + 4 singles + 12 ordered pairs
        assert_eq!(entries.len(), 17);
    }

    #[test]
    fn test_duplicate_tokens_deduplicated() {
        let entries = construct_suggest(Some("Alpha Alpha"), Some(2));
        assert_eq!(inputs(&entries), vec!["", "Alpha"]);
    }

    #[test]
    fn test_zero_popularity_defaults_to_one() {
        let entries = construct_suggest(Some("Alpha Beta"), Some(0));
        assert!(entries.iter().all(|e| e.weight == 1));
    }

    #[test]
    fn test_inputs_are_unique() {
        let entries = construct_suggest(Some("x y x y"), Some(4));
        let mut seen = std::collections::HashSet::new();
        for entry in &entries {
            assert!(seen.insert(entry.input.clone()), "duplicate {}", entry.input);
            assert_eq!(entry.weight, 4);
        }
    }

    #[test]
    fn test_serialization_shape() {
        let entry = SuggestionEntry {
            input: "Alpha".to_string(),
            weight: 3,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"input":"Alpha","weight":3}"#);
    }
}
