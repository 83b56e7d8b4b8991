//! Gap Scorer & Formatter: required vs possessed skills per category.
//!
//! "Required" is what the job description mentions; "possessed" is what the
//! resume mentions. Only skills observed in the job description are reported.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::skills::detector::detect;
use crate::skills::graph::{SkillCategory, SkillGraph};
use crate::skills::normalizer::TokenSet;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Raw detection outcome for a single category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub matched: BTreeSet<String>,
    pub missing: BTreeSet<String>,
    pub score: u32, // 0 – 100
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillStatus {
    Matched,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillLine {
    pub name: String,
    pub status: SkillStatus,
}

/// Presentation-ready bundle for one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: SkillCategory,
    pub impact: String,
    #[serde(flatten)]
    pub detection: DetectionResult,
    /// Alphabetical, matched and missing interleaved.
    pub skills: Vec<SkillLine>,
    pub matched_count: usize,
    pub missing_count: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGapReport {
    pub hard_skills: CategoryReport,
    pub soft_skills: CategoryReport,
    pub other_skills: CategoryReport,
}

impl SkillGapReport {
    /// Skills observed in both documents, across all categories.
    pub fn matched_skills(&self) -> Vec<String> {
        [&self.hard_skills, &self.soft_skills, &self.other_skills]
            .into_iter()
            .flat_map(|r| r.detection.matched.iter().cloned())
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

/// Runs detection on both documents and builds the three-category report.
pub fn analyze_skill_gap(graph: &SkillGraph, job_text: &str, resume_text: &str) -> SkillGapReport {
    let job_tokens = TokenSet::from_text(job_text);
    let resume_tokens = TokenSet::from_text(resume_text);
    if job_tokens.is_empty() {
        debug!("Job text has no content words; every category scores 0");
    } else {
        debug!(
            job_words = job_tokens.len(),
            resume_words = resume_tokens.len(),
            "Analyzing skill gap"
        );
    }

    let report_for = |category| {
        let detection = score_category(graph, category, &job_tokens, &resume_tokens);
        format_category(category, detection)
    };

    SkillGapReport {
        hard_skills: report_for(SkillCategory::Hard),
        soft_skills: report_for(SkillCategory::Soft),
        other_skills: report_for(SkillCategory::Other),
    }
}

pub fn score_category(
    graph: &SkillGraph,
    category: SkillCategory,
    job_tokens: &TokenSet,
    resume_tokens: &TokenSet,
) -> DetectionResult {
    let vocabulary = graph.skills(category);
    let required = detect(job_tokens, vocabulary);
    let possessed = detect(resume_tokens, vocabulary);

    let matched: BTreeSet<String> = required.intersection(&possessed).cloned().collect();
    let missing: BTreeSet<String> = required.difference(&possessed).cloned().collect();
    let score = match_score(matched.len(), required.len());

    DetectionResult {
        matched,
        missing,
        score,
    }
}

/// `round(100 × matched / required)`; an empty requirement set scores 0, not 100.
pub fn match_score(matched: usize, required: usize) -> u32 {
    if required == 0 {
        return 0;
    }
    ((matched as f64 / required as f64) * 100.0).round() as u32
}

pub fn format_category(category: SkillCategory, detection: DetectionResult) -> CategoryReport {
    let mut skills: Vec<SkillLine> = detection
        .matched
        .iter()
        .map(|name| SkillLine {
            name: name.clone(),
            status: SkillStatus::Matched,
        })
        .chain(detection.missing.iter().map(|name| SkillLine {
            name: name.clone(),
            status: SkillStatus::Missing,
        }))
        .collect();
    skills.sort_by(|a, b| a.name.cmp(&b.name));

    let matched_count = detection.matched.len();
    let missing_count = detection.missing.len();

    CategoryReport {
        category,
        impact: category.impact_label().to_string(),
        detection,
        skills,
        matched_count,
        missing_count,
        total: matched_count + missing_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = r#"
        Senior Backend Engineer
        Required: Python, Kubernetes, PostgreSQL and Terraform.
        Experience with machine learning a plus.
        Strong communication and leadership; you will mentor juniors. Agile team, remote friendly.
    "#;

    const RESUME: &str = r#"
        Built Python services on Kubernetes. Led a team of 4 and presented quarterly results.
        Worked in Scrum sprints with product stakeholders.
    "#;

    #[test]
    fn test_matched_and_missing_partition_required_set() {
        let graph = SkillGraph::builtin();
        let job_tokens = TokenSet::from_text(JD);
        let resume_tokens = TokenSet::from_text(RESUME);

        for category in SkillCategory::ALL {
            let result = score_category(&graph, category, &job_tokens, &resume_tokens);
            let required = detect(&job_tokens, graph.skills(category));

            assert!(result.matched.is_disjoint(&result.missing));
            let union: BTreeSet<String> = result.matched.union(&result.missing).cloned().collect();
            assert_eq!(union, required, "{category:?}");
            assert!(result.score <= 100);
        }
    }

    #[test]
    fn test_hard_skill_scores() {
        let report = analyze_skill_gap(&SkillGraph::builtin(), JD, RESUME);
        let hard = &report.hard_skills;
        assert!(hard.detection.matched.contains("Python"));
        assert!(hard.detection.matched.contains("Kubernetes"));
        assert!(hard.detection.missing.contains("Terraform"));
        assert!(hard.detection.missing.contains("SQL"));
        assert_eq!(
            hard.detection.score,
            match_score(hard.matched_count, hard.total)
        );
    }

    #[test]
    fn test_empty_requirements_score_zero() {
        let report = analyze_skill_gap(&SkillGraph::builtin(), "", RESUME);
        for r in [&report.hard_skills, &report.soft_skills, &report.other_skills] {
            assert_eq!(r.detection.score, 0);
            assert_eq!(r.total, 0);
            assert!(r.skills.is_empty());
        }
    }

    #[test]
    fn test_full_match_scores_hundred() {
        let report = analyze_skill_gap(&SkillGraph::builtin(), "Rust and Docker", "docker, rust");
        assert_eq!(report.hard_skills.detection.score, 100);
        assert_eq!(report.hard_skills.missing_count, 0);
    }

    #[test]
    fn test_match_score_rounds() {
        assert_eq!(match_score(1, 3), 33);
        assert_eq!(match_score(2, 3), 67);
        assert_eq!(match_score(0, 5), 0);
        assert_eq!(match_score(0, 0), 0);
    }

    #[test]
    fn test_formatter_sorts_and_tags() {
        let detection = DetectionResult {
            matched: ["Rust", "Docker"].iter().map(|s| s.to_string()).collect(),
            missing: ["Kafka", "AWS"].iter().map(|s| s.to_string()).collect(),
            score: 50,
        };
        let report = format_category(SkillCategory::Hard, detection);
        let names: Vec<&str> = report.skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["AWS", "Docker", "Kafka", "Rust"]);
        assert_eq!(report.skills[0].status, SkillStatus::Missing);
        assert_eq!(report.skills[1].status, SkillStatus::Matched);
        assert_eq!(report.impact, "High Impact");
        assert_eq!(report.total, 4);
    }

    #[test]
    fn test_report_serializes_category_keys() {
        let report = analyze_skill_gap(&SkillGraph::builtin(), JD, RESUME);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["soft_skills"]["impact"], "Medium Impact");
        assert_eq!(json["other_skills"]["category"], "other");
        assert!(json["hard_skills"]["score"].is_u64());
    }
}
