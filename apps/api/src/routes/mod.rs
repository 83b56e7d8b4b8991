pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::memory::handlers as memory;
use crate::settings::handlers as settings;
use crate::skills::handlers as skills;
use crate::state::AppState;
use crate::tailoring::handlers as tailoring;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Settings API
        .route(
            "/api/v1/settings",
            get(settings::handle_get_settings).put(settings::handle_update_settings),
        )
        .route("/api/v1/settings/resume", post(settings::handle_upload_resume))
        // Tailoring API
        .route("/api/v1/tailor", post(tailoring::handle_tailor))
        .route("/api/v1/skills/gap", post(skills::handle_skill_gap))
        // Career Memory API
        .route(
            "/api/v1/memory",
            get(memory::handle_get_memory).delete(memory::handle_clear_memory),
        )
        .route("/api/v1/memory/sessions", post(memory::handle_record_session))
        .route(
            "/api/v1/memory/sessions/:id/status",
            patch(memory::handle_update_status),
        )
        .with_state(state)
}
