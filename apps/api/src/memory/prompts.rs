// Prompt constants for the preference summary rebuild.

use crate::memory::models::SessionRecord;

pub const SUMMARY_SYSTEM: &str = "You analyse how a job seeker tailors their resume. \
    Describe their preferences in at most three plain sentences: target roles, \
    recurring keywords, preferred action verbs and bullet length. \
    Respond with the sentences only: no lists, no headings, no JSON.";

/// One compact line per session, oldest first.
pub fn build_summary_prompt(sessions: &[SessionRecord]) -> String {
    let lines: Vec<String> = sessions
        .iter()
        .map(|s| {
            format!(
                "- role: {} | company: {} | keywords: {} | verbs: {} | \
                 avg bullet words: {} | status: {:?}",
                s.target_role,
                s.job.company,
                s.keywords_used.join(", "),
                s.bullet_verbs.join(", "),
                s.avg_bullet_len,
                s.status,
            )
        })
        .collect();

    format!(
        "Recent confirmed resume sessions:\n{}\n\nSummarize this user's resume style preferences.",
        lines.join("\n")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::models::{SessionJob, SessionStatus};
    use chrono::Utc;

    #[test]
    fn test_summary_prompt_lists_each_session() {
        let session = SessionRecord {
            id: 1,
            date: Utc::now(),
            job: SessionJob {
                company: "Acme".to_string(),
                ..Default::default()
            },
            target_role: "SRE".to_string(),
            keywords_used: vec!["Kubernetes".to_string(), "Terraform".to_string()],
            bullet_verbs: vec!["Built".to_string()],
            avg_bullet_len: 14,
            status: SessionStatus::Interview,
        };
        let prompt = build_summary_prompt(&[session.clone(), session]);
        assert_eq!(prompt.matches("- role: SRE").count(), 2);
        assert!(prompt.contains("keywords: Kubernetes, Terraform"));
        assert!(prompt.contains("avg bullet words: 14"));
        assert!(prompt.contains("status: Interview"));
    }
}
