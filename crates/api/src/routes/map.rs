use axum::routing::{get, post};
use axum::Router;

use crate::handlers::map;
use crate::state::AppState;

/// Routes mounted at `/map`.
///
/// ```text
/// GET    /                               -> get_map
/// POST   /markers/{marker_id}/select     -> select_marker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(map::get_map))
        .route("/markers/{marker_id}/select", post(map::select_marker))
}
