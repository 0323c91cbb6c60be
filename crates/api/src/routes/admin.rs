use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Largest accepted multipart body for staged media.
pub const MAX_MEDIA_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Routes mounted at `/admin`.
///
/// ```text
/// GET    /projects                          -> list_projects
/// POST   /drafts                            -> open_draft
/// GET    /drafts/{draft_id}                 -> get_draft
/// PUT    /drafts/{draft_id}                 -> update_draft
/// DELETE /drafts/{draft_id}                 -> discard_draft
/// POST   /drafts/{draft_id}/media           -> stage_media
/// GET    /drafts/{draft_id}/media/{key}     -> preview_media
/// DELETE /drafts/{draft_id}/media/{key}     -> remove_media
/// POST   /drafts/{draft_id}/submit          -> submit_draft
/// POST   /suggest-description               -> suggest_description
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(admin::list_projects))
        .route("/drafts", post(admin::open_draft))
        .route(
            "/drafts/{draft_id}",
            get(admin::get_draft)
                .put(admin::update_draft)
                .delete(admin::discard_draft),
        )
        .route(
            "/drafts/{draft_id}/media",
            post(admin::stage_media).layer(DefaultBodyLimit::max(MAX_MEDIA_UPLOAD_BYTES)),
        )
        .route(
            "/drafts/{draft_id}/media/{key}",
            get(admin::preview_media).delete(admin::remove_media),
        )
        .route("/drafts/{draft_id}/submit", post(admin::submit_draft))
        .route("/suggest-description", post(admin::suggest_description))
}
