pub mod admin;
pub mod health;
pub mod map;
pub mod projects;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /home                                        landing page (GET)
///
/// /projects                                    current snapshot (GET)
/// /projects/refresh                            force refresh (POST)
/// /projects/{id}                               detail view (GET, ?slide=N)
/// /projects/{id}/chat                          assistant reply (POST, SSE)
///
/// /map                                         map view + markers (GET)
/// /map/markers/{marker_id}/select              select marker (POST)
///
/// /admin/projects                              table listing, no fallback (GET)
/// /admin/drafts                                open draft (POST)
/// /admin/drafts/{draft_id}                     get, update, discard
/// /admin/drafts/{draft_id}/media               stage files (POST, multipart)
/// /admin/drafts/{draft_id}/media/{key}         preview, unstage
/// /admin/drafts/{draft_id}/submit              submit (POST)
/// /admin/suggest-description                   AI short description (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(handlers::home::get_home))
        .nest("/projects", projects::router())
        .nest("/map", map::router())
        .nest("/admin", admin::router())
}
