use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{chat, projects};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                -> list
/// POST   /refresh         -> refresh
/// GET    /{id}            -> get_detail
/// POST   /{id}/chat       -> chat (SSE)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list))
        .route("/refresh", post(projects::refresh))
        .route("/{id}", get(projects::get_detail))
        .route("/{id}/chat", post(chat::chat))
}
