use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use huma_db::ListOrigin;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when the last refresh failed.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    pub projects: usize,
    pub origin: ListOrigin,
    /// Whether the chat assistant is configured.
    pub assistant: bool,
}

/// GET /health -- service status and project list summary.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store.current();
    let status = if snapshot.error.is_none() { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        projects: snapshot.records.len(),
        origin: snapshot.origin,
        assistant: state.assistant.is_some(),
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
