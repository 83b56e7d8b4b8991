use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::classify::{ClassifiedError, ErrorCode, RetryPolicy};
use crate::store::StoreError;
use crate::tailoring::schema::SchemaError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    /// A classified generation failure or a local precondition (`NO_KEY`, `NO_RESUME`).
    #[error("Generation error: {0}")]
    Generation(ClassifiedError),

    #[error("Model output could not be parsed: {0}")]
    ResponseParse(#[from] SchemaError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl From<ClassifiedError> for AppError {
    fn from(err: ClassifiedError) -> Self {
        AppError::Generation(err)
    }
}

fn generation_status(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::DailyLimit | ErrorCode::RateLimit => StatusCode::TOO_MANY_REQUESTS,
        ErrorCode::InvalidKey => StatusCode::UNAUTHORIZED,
        ErrorCode::Permission => StatusCode::FORBIDDEN,
        ErrorCode::ServerError | ErrorCode::Unknown => StatusCode::BAD_GATEWAY,
        ErrorCode::NoKey | ErrorCode::NoResume => StatusCode::BAD_REQUEST,
    }
}

/// Renders a classified failure with its retry metadata.
fn classified_response(classified: &ClassifiedError) -> Response {
    let status = generation_status(classified.code);
    if status.is_server_error() {
        tracing::error!("Generation failed: {classified}");
    }

    let policy = classified.retry_policy();
    let body = Json(json!({
        "error": {
            "code": classified.code,
            "message": classified.message,
            "retry_after": classified.retry_after,
            "retryable": policy != RetryPolicy::Disabled,
        }
    }));
    let mut response = (status, body).into_response();
    if let RetryPolicy::Countdown(secs) = policy {
        if let Ok(value) = HeaderValue::from_str(&secs.to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, value);
        }
    }
    response
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Generation(classified) => return classified_response(classified),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::ResponseParse(e) => {
                tracing::warn!("Model output parse failure: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "PARSE_ERROR",
                    "The AI response could not be read. Please retry.".to_string(),
                )
            }
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
