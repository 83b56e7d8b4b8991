//! Career memory service: every mutation is one atomic store update.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::memory::aggregate::{avg_bullet_len, bullet_verbs, next_session_id, recompute};
use crate::memory::models::{
    AggregateRecord, MemoryRecord, SessionJob, SessionRecord, SessionStatus,
};
use crate::models::job::JobPosting;
use crate::models::resume::ResumeRecord;
use crate::store::{load, modify, StateStore, StoreError, MEMORY_KEY};

#[derive(Clone)]
pub struct CareerMemory {
    store: Arc<dyn StateStore>,
}

impl CareerMemory {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub async fn read(&self) -> Result<MemoryRecord, StoreError> {
        load(self.store.as_ref(), MEMORY_KEY).await
    }

    /// Drops every session and the aggregate, summary included.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(MEMORY_KEY).await?;
        info!("Career memory cleared");
        Ok(())
    }

    /// Appends a session derived from a confirmed resume and recomputes the
    /// aggregate. Returns the new session id with the updated memory.
    pub async fn record_session(
        &self,
        job: &JobPosting,
        resume: &ResumeRecord,
        keywords_used: Vec<String>,
    ) -> Result<(i64, MemoryRecord), StoreError> {
        let job_meta = SessionJob {
            title: job.title.clone(),
            company: job.company.clone(),
            source: job.source.clone(),
            url: job.url.clone(),
        };
        let target_role = job.title.trim().to_string();
        let verbs = bullet_verbs(resume);
        let avg_len = avg_bullet_len(resume);

        let store = self.store.as_ref();
        let (memory, session_id) = modify(store, MEMORY_KEY, move |memory: &mut MemoryRecord| {
            let now = Utc::now();
            let id = next_session_id(now.timestamp_millis(), &memory.sessions);
            memory.sessions.push(SessionRecord {
                id,
                date: now,
                job: job_meta,
                target_role,
                keywords_used,
                bullet_verbs: verbs,
                avg_bullet_len: avg_len,
                status: SessionStatus::Tailored,
            });
            memory.aggregate = recompute(&memory.sessions, &memory.aggregate);
            id
        })
        .await?;

        info!(
            "Recorded session {} ({} total)",
            session_id, memory.aggregate.total_sessions
        );
        Ok((session_id, memory))
    }

    /// Overwrites the preference summary and marks it built at the session
    /// count current when the write lands, not when the rebuild started.
    ///
    /// `generation` is `MemoryRecord::generation()` of the snapshot the summary
    /// was built from. If memory was cleared since, nothing is written and
    /// `None` is returned.
    pub async fn update_preference_summary(
        &self,
        summary: String,
        generation: Option<i64>,
    ) -> Result<Option<AggregateRecord>, StoreError> {
        let store = self.store.as_ref();
        let (memory, written) = modify(store, MEMORY_KEY, move |memory: &mut MemoryRecord| {
            if memory.generation() != generation {
                return false;
            }
            memory.aggregate.summary_built_at = memory.aggregate.total_sessions;
            memory.aggregate.preference_summary = Some(summary);
            true
        })
        .await?;
        Ok(written.then_some(memory.aggregate))
    }

    /// Returns the updated session, or `None` when no session has `id`.
    pub async fn update_session_status(
        &self,
        id: i64,
        status: SessionStatus,
    ) -> Result<Option<SessionRecord>, StoreError> {
        let store = self.store.as_ref();
        let (_, updated) = modify(store, MEMORY_KEY, move |memory: &mut MemoryRecord| {
            memory.sessions.iter_mut().find(|s| s.id == id).map(|session| {
                session.status = status;
                session.clone()
            })
        })
        .await?;
        Ok(updated)
    }
}
