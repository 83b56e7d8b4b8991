//! Axum route handlers for the skill gap API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::skills::gap::{analyze_skill_gap, SkillGapReport};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SkillGapRequest {
    pub job_text: String,
    pub resume_text: String,
}

/// POST /api/v1/skills/gap
///
/// Deterministic keyword feedback, independent of the generation call.
pub async fn handle_skill_gap(
    State(state): State<AppState>,
    Json(request): Json<SkillGapRequest>,
) -> Result<Json<SkillGapReport>, AppError> {
    if request.job_text.trim().is_empty() {
        return Err(AppError::Validation("job_text cannot be empty".to_string()));
    }

    let report = analyze_skill_gap(&state.skill_graph, &request.job_text, &request.resume_text);
    tracing::debug!(
        hard = report.hard_skills.detection.score,
        soft = report.soft_skills.detection.score,
        other = report.other_skills.detection.score,
        "Skill gap computed"
    );

    Ok(Json(report))
}
