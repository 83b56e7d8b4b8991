//! Career memory aggregation: pure functions over the session list.

use std::collections::{BTreeMap, HashMap};

use crate::memory::models::{AggregateRecord, SessionRecord, TermCount};
use crate::models::resume::ResumeRecord;

/// Used when a confirmed resume has no bullets at all.
pub const DEFAULT_AVG_BULLET_LEN: u32 = 18;
pub const TOP_KEYWORDS: usize = 20;
pub const TOP_BULLET_VERBS: usize = 10;
/// Sessions that must accrue between preference summary rebuilds.
pub const SUMMARY_REBUILD_INTERVAL: u32 = 5;
pub const SUMMARY_MIN_SESSIONS: u32 = 2;
/// Most recent sessions sent to the summary prompt.
pub const SUMMARY_WINDOW: usize = 10;

/// First word of every bullet, kept when capitalized and longer than one
/// character, deduplicated in first-seen order. A cheap proxy for action verbs.
pub fn bullet_verbs(resume: &ResumeRecord) -> Vec<String> {
    let mut verbs: Vec<String> = Vec::new();
    for bullet in resume.bullets() {
        let Some(word) = bullet.text.split_whitespace().next() else {
            continue;
        };
        let capitalized = word.chars().next().is_some_and(char::is_uppercase);
        if capitalized && word.chars().count() > 1 && !verbs.iter().any(|v| v == word) {
            verbs.push(word.to_string());
        }
    }
    verbs
}

/// Mean bullet word count, rounded.
pub fn avg_bullet_len(resume: &ResumeRecord) -> u32 {
    let counts: Vec<usize> = resume
        .bullets()
        .map(|b| b.text.split_whitespace().count())
        .collect();
    if counts.is_empty() {
        return DEFAULT_AVG_BULLET_LEN;
    }
    (counts.iter().sum::<usize>() as f64 / counts.len() as f64).round() as u32
}

/// Fully recomputes the aggregate from `sessions`, keeping `previous`'s
/// preference summary and its build marker.
pub fn recompute(sessions: &[SessionRecord], previous: &AggregateRecord) -> AggregateRecord {
    let mut target_roles: BTreeMap<String, u32> = BTreeMap::new();
    for session in sessions.iter().filter(|s| !s.target_role.is_empty()) {
        *target_roles.entry(session.target_role.clone()).or_insert(0) += 1;
    }

    let avg_bullet_len = if sessions.is_empty() {
        0
    } else {
        let total: u64 = sessions.iter().map(|s| s.avg_bullet_len as u64).sum();
        (total as f64 / sessions.len() as f64).round() as u32
    };

    AggregateRecord {
        total_sessions: sessions.len() as u32,
        target_roles,
        top_keywords: top_terms(
            sessions.iter().flat_map(|s| &s.keywords_used),
            TOP_KEYWORDS,
        ),
        top_bullet_verbs: top_terms(
            sessions.iter().flat_map(|s| &s.bullet_verbs),
            TOP_BULLET_VERBS,
        ),
        avg_bullet_len,
        preference_summary: previous.preference_summary.clone(),
        summary_built_at: previous.summary_built_at,
    }
}

/// Frequency table reduced to the `limit` most frequent terms.
/// Ties keep first-encountered order (stable sort on count only).
fn top_terms<'a>(terms: impl Iterator<Item = &'a String>, limit: usize) -> Vec<TermCount> {
    let mut counts: Vec<TermCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for term in terms {
        match index.get(term.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(term.as_str(), counts.len());
                counts.push(TermCount {
                    term: term.clone(),
                    count: 1,
                });
            }
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(limit);
    counts
}

/// True once `SUMMARY_REBUILD_INTERVAL` sessions have accrued since the last
/// summary write, and there are at least `SUMMARY_MIN_SESSIONS` sessions.
pub fn should_rebuild_summary(aggregate: &AggregateRecord) -> bool {
    let since_last = aggregate
        .total_sessions
        .saturating_sub(aggregate.summary_built_at);
    aggregate.total_sessions >= SUMMARY_MIN_SESSIONS && since_last >= SUMMARY_REBUILD_INTERVAL
}

/// Strictly increasing session id: `now`, or one past the newest id.
pub fn next_session_id(now_ms: i64, sessions: &[SessionRecord]) -> i64 {
    match sessions.iter().map(|s| s.id).max() {
        Some(last) if now_ms <= last => last + 1,
        _ => now_ms,
    }
}

/// The newest `SUMMARY_WINDOW` sessions, oldest first.
pub fn recent_sessions(sessions: &[SessionRecord]) -> &[SessionRecord] {
    &sessions[sessions.len().saturating_sub(SUMMARY_WINDOW)..]
}
