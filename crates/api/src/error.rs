use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use huma_assistant::AssistantError;
use huma_core::error::CoreError;
use huma_core::form::ValidationError;
use huma_db::TransportError;

use crate::forms::SubmitError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and the collaborator errors, and
/// implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `huma_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The hosted table or storage could not be reached or refused the call.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The chat completion service failed.
    #[error(transparent)]
    Assistant(#[from] AssistantError),

    /// No chat completion service is configured.
    #[error("El asistente no está disponible: falta configurar GEMINI_API_KEY.")]
    AssistantUnavailable,

    /// Draft input did not validate.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Draft submission failed.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{entity} with id {id} not found"),
            ),

            // --- Collaborators ---
            AppError::Transport(err) => {
                tracing::warn!(error = %err, "Upstream table/storage error");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
            }
            AppError::Assistant(err) => {
                tracing::warn!(error = %err, "Assistant error");
                (StatusCode::BAD_GATEWAY, "ASSISTANT_ERROR", err.to_string())
            }
            AppError::AssistantUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ASSISTANT_UNAVAILABLE",
                self.to_string(),
            ),

            // --- Drafts ---
            AppError::Validation(err) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
            }
            AppError::Submit(err) => match err {
                SubmitError::Validation(inner) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", inner.to_string())
                }
                SubmitError::DraftNotFound(_) => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string())
                }
                SubmitError::Upload { .. } => {
                    (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR", err.to_string())
                }
                SubmitError::Persist(_) => {
                    (StatusCode::BAD_GATEWAY, "PERSIST_ERROR", err.to_string())
                }
                SubmitError::InProgress(_) => {
                    (StatusCode::CONFLICT, "SUBMIT_IN_PROGRESS", err.to_string())
                }
                SubmitError::Interrupted(msg) => {
                    tracing::error!(error = %msg, "Submission task failed");
                    internal()
                }
            },

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
