//! Skill Detector: which skills of a vocabulary appear in a token set.

use std::collections::BTreeSet;

use crate::skills::graph::Skill;
use crate::skills::normalizer::TokenSet;

/// Returns the names of every skill with at least one fully-present synonym.
///
/// A synonym is present when each of its words is somewhere in the token set.
/// Word order and adjacency are not checked, so "machine learning" registers
/// for a document mentioning "machine" and "learning" in unrelated sentences.
pub fn detect(tokens: &TokenSet, vocabulary: &[Skill]) -> BTreeSet<String> {
    vocabulary
        .iter()
        .filter(|skill| skill.synonyms.iter().any(|phrase| phrase_present(tokens, phrase)))
        .map(|skill| skill.name.clone())
        .collect()
}

fn phrase_present(tokens: &TokenSet, phrase: &[String]) -> bool {
    !phrase.is_empty() && phrase.iter().all(|word| tokens.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::graph::{SkillCategory, SkillGraph};

    fn hard(graph: &SkillGraph) -> &[Skill] {
        graph.skills(SkillCategory::Hard)
    }

    #[test]
    fn test_single_word_synonym_detected() {
        let graph = SkillGraph::builtin();
        let tokens = TokenSet::from_text("Five years of Kubernetes in production.");
        let found = detect(&tokens, hard(&graph));
        assert!(found.contains("Kubernetes"));
    }

    #[test]
    fn test_any_synonym_is_enough() {
        let graph = SkillGraph::builtin();
        let tokens = TokenSet::from_text("Ran workloads on k8s clusters");
        assert!(detect(&tokens, hard(&graph)).contains("Kubernetes"));
    }

    #[test]
    fn test_multi_word_phrase_requires_every_word() {
        let graph = SkillGraph::builtin();
        let tokens = TokenSet::from_text("Strong interest in learning new things");
        assert!(!detect(&tokens, hard(&graph)).contains("Machine Learning"));
    }

    #[test]
    fn test_scattered_words_still_match_phrase() {
        let graph = SkillGraph::builtin();
        let tokens = TokenSet::from_text(
            "Operated the packaging machine on night shift. Learning Spanish on weekends.",
        );
        assert!(detect(&tokens, hard(&graph)).contains("Machine Learning"));
    }

    #[test]
    fn test_word_order_is_ignored() {
        let graph = SkillGraph::builtin();
        let tokens = TokenSet::from_text("learning machine");
        assert!(detect(&tokens, hard(&graph)).contains("Machine Learning"));
    }

    #[test]
    fn test_no_substring_matching() {
        let graph = SkillGraph::builtin();
        // "javascripting" is a different token from "javascript"
        let tokens = TokenSet::from_text("javascripting trustworthy");
        let found = detect(&tokens, hard(&graph));
        assert!(!found.contains("JavaScript"));
        assert!(!found.contains("Rust"));
    }

    #[test]
    fn test_empty_token_set_detects_nothing() {
        let graph = SkillGraph::builtin();
        for category in SkillCategory::ALL {
            assert!(detect(&TokenSet::default(), graph.skills(category)).is_empty());
        }
    }

    #[test]
    fn test_empty_phrase_never_matches() {
        let skills = vec![Skill {
            name: "Ghost".to_string(),
            synonyms: vec![vec![]],
        }];
        let tokens = TokenSet::from_text("anything at all");
        assert!(detect(&tokens, &skills).is_empty());
    }
}
