//! Text Normalizer: lowercases, strips punctuation, tokenizes and drops stopwords.
//!
//! No stemming: variant forms (plurals, abbreviations) are enumerated as
//! separate synonyms in the skill graph instead.

use std::collections::HashSet;

/// Words that carry no skill signal on their own.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and", "any",
    "are", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "etc",
    "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers",
    "him", "his", "how", "i", "if", "in", "into", "is", "its", "itself", "just", "me", "more",
    "most", "must", "my", "no", "nor", "not", "of", "off", "on", "once", "only", "or", "other",
    "our", "ours", "out", "over", "own", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this", "those",
    "through", "to", "too", "under", "until", "up", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours",
];

/// Unordered set of normalized words derived from one document.
///
/// Position is deliberately discarded: detection is a set-containment test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSet(HashSet<String>);

impl TokenSet {
    pub fn from_text(text: &str) -> Self {
        Self(normalize(text).into_iter().collect())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Normalizes raw text into an ordered token sequence with stopwords removed.
///
/// Word characters are Unicode alphanumerics and `_`; every other
/// non-whitespace character becomes a separator.
pub fn normalize(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|t| !is_stopword(t))
        .map(str::to_string)
        .collect()
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let tokens = normalize("Built REST APIs; shipped CI/CD (GitHub-Actions)!");
        assert_eq!(
            tokens,
            vec!["built", "rest", "apis", "shipped", "ci", "cd", "github", "actions"]
        );
    }

    #[test]
    fn test_drops_stopwords_and_empty_tokens() {
        let tokens = normalize("  The  team and I  worked on   the backend ");
        assert_eq!(tokens, vec!["team", "worked", "backend"]);
    }

    #[test]
    fn test_keeps_underscores_and_digits() {
        let tokens = normalize("snake_case k8s 2024");
        assert_eq!(tokens, vec!["snake_case", "k8s", "2024"]);
    }

    #[test]
    fn test_unicode_letters_are_word_characters() {
        let tokens = normalize("Café résumé");
        assert_eq!(tokens, vec!["café", "résumé"]);
    }

    #[test]
    fn test_empty_text_yields_empty_set() {
        assert!(TokenSet::from_text("").is_empty());
        assert!(TokenSet::from_text("the and of !!!").is_empty());
    }

    #[test]
    fn test_normalization_is_idempotent_on_token_set() {
        let text = "Senior Rust engineer, Kubernetes & Terraform; on-call.";
        let rejoined = normalize(text).join(" ");
        assert_eq!(normalize(&rejoined), normalize(text));
        assert_eq!(TokenSet::from_text(&rejoined), TokenSet::from_text(text));
    }

    #[test]
    fn test_token_set_deduplicates() {
        let set = TokenSet::from_text("rust Rust RUST");
        assert_eq!(set.len(), 1);
        assert!(set.contains("rust"));
    }
}
