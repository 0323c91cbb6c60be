//! Handler for the landing page.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use huma_core::home::HomeView;

use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    /// Hero slide to show; wrapped into range.
    #[serde(default)]
    pub hero_slide: usize,
}

/// GET /api/v1/home
pub async fn get_home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Json<DataResponse<HomeView>> {
    let snapshot = state.store.current();
    let view = HomeView::build(&snapshot.records, query.hero_slide, &state.contact);
    Json(DataResponse { data: view })
}
