//! Axum route handlers for the Career Memory API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::AppError;
use crate::memory::aggregate::should_rebuild_summary;
use crate::memory::models::{AggregateRecord, MemoryRecord, SessionRecord, SessionStatus};
use crate::memory::rebuild::spawn_summary_rebuild;
use crate::models::job::JobPosting;
use crate::models::resume::ResumeRecord;
use crate::settings::load_settings;
use crate::skills::gap::analyze_skill_gap;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordSessionRequest {
    pub job: JobPosting,
    pub resume: ResumeRecord,
    /// Derived from the job/resume skill overlap when omitted.
    pub keywords_used: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RecordSessionResponse {
    pub session_id: i64,
    pub aggregate: AggregateRecord,
    pub summary_rebuild_started: bool,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: SessionStatus,
}

/// GET /api/v1/memory
pub async fn handle_get_memory(
    State(state): State<AppState>,
) -> Result<Json<MemoryRecord>, AppError> {
    Ok(Json(state.memory.read().await?))
}

/// DELETE /api/v1/memory
pub async fn handle_clear_memory(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.memory.clear().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/memory/sessions
///
/// Called when the user confirms a download. Records the session and, when
/// due, starts a detached preference summary rebuild. The response does not
/// wait for the rebuild.
pub async fn handle_record_session(
    State(state): State<AppState>,
    Json(request): Json<RecordSessionRequest>,
) -> Result<Json<RecordSessionResponse>, AppError> {
    let keywords_used = request.keywords_used.unwrap_or_else(|| {
        analyze_skill_gap(
            &state.skill_graph,
            &request.job.description,
            &request.resume.plain_text(),
        )
        .matched_skills()
    });

    let (session_id, memory) = state
        .memory
        .record_session(&request.job, &request.resume, keywords_used)
        .await?;

    let mut summary_rebuild_started = false;
    if should_rebuild_summary(&memory.aggregate) {
        let settings = load_settings(state.store.as_ref()).await?;
        let api_key = settings.api_key.trim();
        if api_key.is_empty() {
            debug!("Summary rebuild due but no API key is configured");
        } else {
            // Detached: completion writes memory on its own.
            spawn_summary_rebuild(
                state.memory.clone(),
                state.llm.clone(),
                api_key.to_string(),
                &memory,
            );
            summary_rebuild_started = true;
        }
    }

    Ok(Json(RecordSessionResponse {
        session_id,
        aggregate: memory.aggregate,
        summary_rebuild_started,
    }))
}

/// PATCH /api/v1/memory/sessions/:id/status
pub async fn handle_update_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<SessionRecord>, AppError> {
    state
        .memory
        .update_session_status(id, update.status)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}
