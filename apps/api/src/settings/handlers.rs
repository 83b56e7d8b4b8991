//! Axum route handlers for the Settings API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use tracing::info;

use crate::errors::AppError;
use crate::settings::{load_settings, update_settings, Settings, SettingsPatch};
use crate::state::AppState;

/// GET /api/v1/settings
pub async fn handle_get_settings(
    State(state): State<AppState>,
) -> Result<Json<Settings>, AppError> {
    let settings = load_settings(state.store.as_ref()).await?;
    Ok(Json(settings.masked()))
}

/// PUT /api/v1/settings
pub async fn handle_update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> Result<Json<Settings>, AppError> {
    let settings = update_settings(state.store.as_ref(), patch).await?;
    Ok(Json(settings.masked()))
}

/// POST /api/v1/settings/resume
///
/// Multipart upload of the base resume. PDFs go through text extraction;
/// anything else must be UTF-8 text.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Settings>, AppError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let file_name = field.file_name().unwrap_or_default().to_lowercase();
    let content_type = field.content_type().unwrap_or_default().to_string();
    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

    let text = extract_resume_text(&file_name, &content_type, &bytes)?;
    if text.trim().is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No text could be extracted from the uploaded file".to_string(),
        ));
    }

    info!("Extracted {} chars from uploaded resume '{}'", text.len(), file_name);

    let settings = update_settings(
        state.store.as_ref(),
        SettingsPatch {
            base_resume_text: Some(text),
            onboarding_done: Some(true),
            ..Default::default()
        },
    )
    .await?;

    Ok(Json(settings.masked()))
}

fn extract_resume_text(
    file_name: &str,
    content_type: &str,
    bytes: &[u8],
) -> Result<String, AppError> {
    let is_pdf = content_type == "application/pdf"
        || file_name.ends_with(".pdf")
        || bytes.starts_with(b"%PDF");
    if is_pdf {
        return pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::UnprocessableEntity(format!("Could not read PDF: {e}")));
    }
    String::from_utf8(bytes.to_vec())
        .map_err(|_| AppError::Validation("Upload a PDF or a UTF-8 text file".to_string()))
}
