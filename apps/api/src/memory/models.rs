use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Tailored,
    Applied,
    Interview,
    Offer,
    Rejected,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionJob {
    pub title: String,
    pub company: String,
    pub source: String,
    pub url: String,
}

/// One confirmed download. Only `status` changes after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Millisecond timestamp, strictly increasing across sessions.
    pub id: i64,
    pub date: DateTime<Utc>,
    pub job: SessionJob,
    pub target_role: String,
    pub keywords_used: Vec<String>,
    pub bullet_verbs: Vec<String>,
    pub avg_bullet_len: u32,
    #[serde(default)]
    pub status: SessionStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: u32,
}

/// Derived from `sessions` on every append, except the preference summary
/// pair which is carried over as opaque state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateRecord {
    pub total_sessions: u32,
    pub target_roles: BTreeMap<String, u32>,
    pub top_keywords: Vec<TermCount>,
    pub top_bullet_verbs: Vec<TermCount>,
    pub avg_bullet_len: u32,
    pub preference_summary: Option<String>,
    /// `total_sessions` at the last summary write.
    pub summary_built_at: u32,
}

/// The persisted career memory: append-only session list plus its aggregate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryRecord {
    pub sessions: Vec<SessionRecord>,
    pub aggregate: AggregateRecord,
}

impl MemoryRecord {
    /// Id of the oldest session. Sessions are only ever appended, so this
    /// changes only when memory is cleared.
    pub fn generation(&self) -> Option<i64> {
        self.sessions.first().map(|s| s.id)
    }
}
