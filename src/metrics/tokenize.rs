//! Transcript text normalisation.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Discourse markers counted as fillers. Matching is per token, so the
/// two-word entries never match.
pub const FILLER_WORDS: [&str; 12] = [
    "um", "uh", "like", "you know", "so", "actually", "basically", "right", "i mean", "and",
    "but", "or",
];

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[\n.,!?;:"'()\[\]{}_-]"#).expect("punctuation pattern is a valid regex")
});

/// Replace punctuation and brackets with spaces and lower-case the result.
pub fn normalize(text: &str) -> String {
    PUNCTUATION.replace_all(text, " ").to_lowercase()
}

/// Token multiset of the normalised text.
pub fn token_counts(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in normalize(text).split_whitespace() {
        *counts.entry(word.to_string()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_brackets_and_quotes() {
        assert_eq!(normalize("Well-known (it's) [ok]!"), "well known  it s   ok  ");
    }

    #[test]
    fn test_token_counts() {
        let counts = token_counts("So, so... SO?\nyes");
        assert_eq!(counts.get("so"), Some(&3));
        assert_eq!(counts.get("yes"), Some(&1));
        assert_eq!(counts.len(), 2);
    }
}
