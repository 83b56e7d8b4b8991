use std::sync::Arc;

use crate::llm_client::TextGenerator;
use crate::memory::service::CareerMemory;
use crate::skills::graph::SkillGraph;
use crate::store::StateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Settings and career memory live here. Redis when configured, else in-process.
    pub store: Arc<dyn StateStore>,
    pub llm: Arc<dyn TextGenerator>,
    /// Built once at startup; read-only afterwards.
    pub skill_graph: Arc<SkillGraph>,
    pub memory: CareerMemory,
}

impl AppState {
    pub fn new(
        store: Arc<dyn StateStore>,
        llm: Arc<dyn TextGenerator>,
        skill_graph: SkillGraph,
    ) -> Self {
        Self {
            memory: CareerMemory::new(store.clone()),
            store,
            llm,
            skill_graph: Arc::new(skill_graph),
        }
    }
}
