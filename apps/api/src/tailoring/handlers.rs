//! Axum route handlers for the Tailoring API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::classify::classify;
use crate::memory::service::CareerMemory;
use crate::models::job::JobPosting;
use crate::models::resume::ResumeRecord;
use crate::settings::load_settings;
use crate::skills::gap::{analyze_skill_gap, SkillGapReport};
use crate::state::AppState;
use crate::tailoring::prompts::{build_system_prompt, build_user_prompt};
use crate::tailoring::schema::normalize_response;

#[derive(Debug, Deserialize)]
pub struct TailorRequest {
    pub job: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct TailorResponse {
    pub resume: ResumeRecord,
    /// Job description vs the stored base resume.
    pub skill_gap: SkillGapReport,
}

/// POST /api/v1/tailor
///
/// Pipeline: preconditions → prompt (with cached preference summary) →
/// generation → classify on failure / normalize on success.
pub async fn handle_tailor(
    State(state): State<AppState>,
    Json(request): Json<TailorRequest>,
) -> Result<Json<TailorResponse>, AppError> {
    if request.job.description.trim().is_empty() {
        return Err(AppError::Validation("job.description cannot be empty".to_string()));
    }

    let settings = load_settings(state.store.as_ref()).await?;
    let inputs = settings.require_generation_inputs()?;

    let preference_summary = preference_summary(&state.memory).await;
    let system = build_system_prompt(preference_summary.as_deref());
    let prompt = build_user_prompt(&inputs.resume_text, &request.job);

    info!(
        "Tailoring resume for '{}' at '{}'",
        request.job.title, request.job.company
    );

    let raw = state
        .llm
        .generate(&inputs.api_key, &system, &prompt)
        .await
        .map_err(|e| AppError::Generation(classify(&e.signal())))?;

    let resume = normalize_response(&raw)?;
    let skill_gap = analyze_skill_gap(
        &state.skill_graph,
        &request.job.description,
        &inputs.resume_text,
    );

    info!(
        "Tailored resume: {} roles, {} skills, hard-skill match {}%",
        resume.experience.len(),
        resume.skills.len(),
        skill_gap.hard_skills.detection.score
    );

    Ok(Json(TailorResponse { resume, skill_gap }))
}

/// Personalization is best-effort: a memory read failure only loses the hint.
async fn preference_summary(memory: &CareerMemory) -> Option<String> {
    match memory.read().await {
        Ok(record) => record.aggregate.preference_summary,
        Err(e) => {
            warn!("Could not read career memory for prompt personalization: {e}");
            None
        }
    }
}
