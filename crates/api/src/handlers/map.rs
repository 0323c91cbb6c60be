//! Handlers for the public map.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use huma_core::detail::{DetailPresenter, DetailView};
use huma_core::error::CoreError;
use huma_core::map::MarkerId;
use huma_core::view::{Navigator, Screen, ViewEvent};

use crate::error::{AppError, AppResult};
use crate::handlers::find_project;
use crate::map_layer::MapPayload;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response of a marker selection: the raised event and where it leads.
#[derive(Debug, Serialize)]
pub struct Selection {
    pub event: ViewEvent,
    pub screen: Screen,
    pub detail: DetailView,
}

/// GET /api/v1/map
pub async fn get_map(State(state): State<AppState>) -> Json<DataResponse<MapPayload>> {
    let snapshot = state.store.current();
    let mut layer = state.map.write().await;
    layer.sync(&snapshot);
    Json(DataResponse {
        data: layer.payload(),
    })
}

/// POST /api/v1/map/markers/{marker_id}/select
pub async fn select_marker(
    State(state): State<AppState>,
    Path(marker_id): Path<MarkerId>,
) -> AppResult<Json<DataResponse<Selection>>> {
    let event = state.map.read().await.select(marker_id).ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Marker",
            id: marker_id.to_string(),
        })
    })?;

    let mut navigator = Navigator::new();
    let screen = navigator.handle(event.clone()).clone();
    let project_id = match &screen {
        Screen::Detail(id) => id.clone(),
        _ => {
            return Err(AppError::InternalError(
                "marker selection did not open a detail screen".into(),
            ))
        }
    };

    let record = find_project(&state, &project_id)?;
    let detail = DetailPresenter::new(record).render(&state.contact);
    Ok(Json(DataResponse {
        data: Selection {
            event,
            screen,
            detail,
        },
    }))
}
