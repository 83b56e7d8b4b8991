//! Preference summary rebuild: a detached, best-effort background task.
//!
//! The user's request never waits on this. Failures are classified and
//! logged, never surfaced and never retried.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::llm_client::classify::classify;
use crate::llm_client::TextGenerator;
use crate::memory::aggregate::recent_sessions;
use crate::memory::models::MemoryRecord;
use crate::memory::prompts::{build_summary_prompt, SUMMARY_SYSTEM};
use crate::memory::service::CareerMemory;

/// Spawns the rebuild over the most recent sessions of `snapshot`.
pub fn spawn_summary_rebuild(
    memory: CareerMemory,
    llm: Arc<dyn TextGenerator>,
    api_key: String,
    snapshot: &MemoryRecord,
) -> JoinHandle<()> {
    let prompt = build_summary_prompt(recent_sessions(&snapshot.sessions));
    let at_sessions = snapshot.aggregate.total_sessions;
    let generation = snapshot.generation();

    tokio::spawn(async move {
        info!("Rebuilding preference summary at {at_sessions} sessions");

        let summary = match llm.generate(&api_key, SUMMARY_SYSTEM, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                let classified = classify(&e.signal());
                warn!(
                    code = ?classified.code,
                    "Preference summary rebuild failed: {}", classified.message
                );
                return;
            }
        };

        match memory.update_preference_summary(summary, generation).await {
            Ok(Some(aggregate)) => info!(
                "Preference summary stored (built at {} sessions)",
                aggregate.summary_built_at
            ),
            Ok(None) => info!("Career memory was cleared during the rebuild; summary discarded"),
            Err(e) => warn!("Failed to store preference summary: {e}"),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::job::JobPosting;
    use crate::models::resume::ResumeRecord;
    use crate::store::InMemoryStore;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::Notify;

    struct ScriptedGenerator {
        reply: Result<String, u16>,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            _api_key: &str,
            _system: &str,
            prompt: &str,
        ) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "RESOURCE_EXHAUSTED".to_string(),
                }),
            }
        }
    }

    async fn seeded(n: usize) -> (CareerMemory, MemoryRecord) {
        let memory = CareerMemory::new(Arc::new(InMemoryStore::new()));
        let job = JobPosting {
            title: "SRE".to_string(),
            ..Default::default()
        };
        for _ in 0..n {
            memory
                .record_session(&job, &ResumeRecord::default(), vec!["Go".to_string()])
                .await
                .unwrap();
        }
        let snapshot = memory.read().await.unwrap();
        (memory, snapshot)
    }

    #[tokio::test]
    async fn test_successful_rebuild_stores_raw_text() {
        let (memory, snapshot) = seeded(12).await;
        let llm = Arc::new(ScriptedGenerator {
            reply: Ok("Targets SRE roles.\n".to_string()),
            prompts: Mutex::new(Vec::new()),
        });

        spawn_summary_rebuild(memory.clone(), llm.clone(), "key".to_string(), &snapshot)
            .await
            .unwrap();

        let aggregate = memory.read().await.unwrap().aggregate;
        assert_eq!(aggregate.preference_summary.as_deref(), Some("Targets SRE roles.\n"));
        assert_eq!(aggregate.summary_built_at, 12);

        // only the ten most recent sessions are sent
        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts[0].matches("- role: SRE").count(), 10);
    }

    #[tokio::test]
    async fn test_failed_rebuild_leaves_memory_untouched() {
        let (memory, snapshot) = seeded(5).await;
        let llm = Arc::new(ScriptedGenerator {
            reply: Err(429),
            prompts: Mutex::new(Vec::new()),
        });

        spawn_summary_rebuild(memory.clone(), llm, "key".to_string(), &snapshot)
            .await
            .unwrap();

        let after = memory.read().await.unwrap();
        assert_eq!(after, snapshot);
        assert!(after.aggregate.preference_summary.is_none());
    }

    /// Replies only once the test releases it.
    struct GatedGenerator {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl TextGenerator for GatedGenerator {
        async fn generate(
            &self,
            _api_key: &str,
            _system: &str,
            _prompt: &str,
        ) -> Result<String, LlmError> {
            self.gate.notified().await;
            Ok("Targets SRE roles.".to_string())
        }
    }

    #[tokio::test]
    async fn test_rebuild_finishing_after_clear_writes_nothing() {
        let (memory, snapshot) = seeded(5).await;
        let gate = Arc::new(Notify::new());
        let llm = Arc::new(GatedGenerator { gate: gate.clone() });

        let handle = spawn_summary_rebuild(memory.clone(), llm, "key".to_string(), &snapshot);
        memory.clear().await.unwrap();
        gate.notify_one();
        handle.await.unwrap();

        assert_eq!(memory.read().await.unwrap(), MemoryRecord::default());
    }
}
