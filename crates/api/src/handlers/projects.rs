//! Handlers for the public `/projects` resource.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use huma_core::detail::{DetailPresenter, DetailView};
use huma_db::ProjectSnapshot;

use crate::error::AppResult;
use crate::handlers::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// Carousel slide to open at; wrapped into range.
    #[serde(default)]
    pub slide: usize,
}

/// GET /api/v1/projects
pub async fn list(State(state): State<AppState>) -> Json<DataResponse<ProjectSnapshot>> {
    Json(DataResponse {
        data: state.store.current(),
    })
}

/// POST /api/v1/projects/refresh
///
/// Always 200: a failed fetch is reported in the snapshot's `error`.
pub async fn refresh(State(state): State<AppState>) -> Json<DataResponse<ProjectSnapshot>> {
    Json(DataResponse {
        data: state.store.refresh().await,
    })
}

/// GET /api/v1/projects/{id}
pub async fn get_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<DetailQuery>,
) -> AppResult<Json<DataResponse<DetailView>>> {
    let record = find_project(&state, &id)?;
    let view = DetailPresenter::at_slide(record, query.slide).render(&state.contact);
    Ok(Json(DataResponse { data: view }))
}
