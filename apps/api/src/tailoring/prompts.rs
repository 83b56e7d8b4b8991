// All LLM prompt constants for the tailoring module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{truncate_chars, JSON_ONLY_DIRECTIVE, JSON_ONLY_SYSTEM};
use crate::models::job::JobPosting;

/// Job descriptions beyond this many characters are cut before sending.
pub const JOB_TEXT_BUDGET: usize = 4000;

/// Fixed tailoring rules.
pub const TAILOR_RULES: &str = "You are an expert resume writer. \
    Rewrite the candidate's resume so it targets the job below. \
    Keep every fact traceable to the original resume: \
    never invent employers, titles, dates, degrees or metrics. \
    Reorder and rephrase bullets to surface the job's keywords where the resume supports them. \
    Start every bullet with a strong past-tense action verb. \
    If a bullet stretches beyond what the original resume states, mark it with \"f\":true.";

/// Abbreviated-key output schema. Short keys keep output tokens down.
pub const TAILOR_SCHEMA: &str = r#"Return ONE JSON object with these abbreviated keys:
{
  "n": "full name", "e": "email", "p": "phone", "l": "location", "li": "linkedin url",
  "s": "2-3 sentence summary",
  "x": [
    {"c": "company", "t": "job title", "d": "dates",
     "b": ["bullet text", {"t": "bullet text", "f": true}]}
  ],
  "sk": ["skill"],
  "ed": [{"i": "institution", "g": "degree", "d": "dates"}]
}
Plain string bullets are faithful to the resume.
Use {"t": ..., "f": true} only for embellished ones."#;

/// Builds the system instruction, appending the cached preference summary when present.
pub fn build_system_prompt(preference_summary: Option<&str>) -> String {
    let mut system = format!("{TAILOR_RULES}\n\n{TAILOR_SCHEMA}\n\n{JSON_ONLY_SYSTEM}");
    if let Some(summary) = preference_summary.map(str::trim).filter(|s| !s.is_empty()) {
        system.push_str("\n\nThe user's preferences from past sessions: ");
        system.push_str(summary);
    }
    system
}

/// Builds the user instruction: resume, job header, truncated job text, JSON directive.
pub fn build_user_prompt(resume_text: &str, job: &JobPosting) -> String {
    let mut header = String::new();
    for (label, value) in [
        ("Title", &job.title),
        ("Company", &job.company),
        ("Location", &job.location),
    ] {
        if !value.trim().is_empty() {
            header.push_str(&format!("{label}: {}\n", value.trim()));
        }
    }

    format!(
        "RESUME:\n{resume}\n\nJOB:\n{header}{description}\n\n{JSON_ONLY_DIRECTIVE}",
        resume = resume_text.trim(),
        description = truncate_chars(job.description.trim(), JOB_TEXT_BUDGET),
    )
}
