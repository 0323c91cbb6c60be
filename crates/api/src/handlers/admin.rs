//! Handlers for the admin surface: listing, drafts, staged media, submission
//! and description suggestions.
//!
//! No login gate is applied here; these routes are meant to sit behind an
//! authenticating proxy.

use axum::extract::{Multipart, Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use huma_core::form::{DraftId, DraftUpdate, DraftView};
use huma_core::normalize::NormalizeReport;
use huma_core::preview::{PreviewKey, StagedFile};
use huma_core::record::ProjectRecord;
use huma_core::types::ProjectId;

use crate::error::{AppError, AppResult};
use crate::forms::controller::draft_not_found;
use crate::forms::SubmitOutcome;
use crate::handlers::find_project;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// One row of the admin table, with its normalization report.
#[derive(Debug, Serialize)]
pub struct AdminProject {
    pub record: ProjectRecord,
    pub report: NormalizeReport,
    pub clean: bool,
}

/// GET /api/v1/admin/projects
///
/// Reads the table directly. Unlike the public list there is no sample
/// fallback: a failed fetch is a 502.
pub async fn list_projects(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AdminProject>>>> {
    let projects = state
        .store
        .fetch()
        .await?
        .into_iter()
        .map(|n| AdminProject {
            clean: n.report.is_clean(),
            record: n.record,
            report: n.report,
        })
        .collect();
    Ok(Json(DataResponse { data: projects }))
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct OpenDraftInput {
    /// Edit this project; absent opens an empty draft.
    pub project_id: Option<ProjectId>,
}

/// POST /api/v1/admin/drafts
pub async fn open_draft(
    State(state): State<AppState>,
    Json(input): Json<OpenDraftInput>,
) -> AppResult<(StatusCode, Json<DataResponse<DraftView>>)> {
    let view = match input.project_id {
        Some(id) => {
            let record = find_project(&state, &id)?;
            state.forms.open_edit(&record).await
        }
        None => state.forms.open_create().await,
    };
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/admin/drafts/{draft_id}
pub async fn get_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
) -> AppResult<Json<DataResponse<DraftView>>> {
    let view = state
        .forms
        .view(draft_id)
        .await
        .ok_or_else(|| draft_not_found(draft_id))?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/admin/drafts/{draft_id}
pub async fn update_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    Json(update): Json<DraftUpdate>,
) -> AppResult<Json<DataResponse<DraftView>>> {
    let view = state
        .forms
        .update(draft_id, update)
        .await
        .ok_or_else(|| draft_not_found(draft_id))?;
    Ok(Json(DataResponse { data: view }))
}

/// DELETE /api/v1/admin/drafts/{draft_id}
pub async fn discard_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
) -> AppResult<StatusCode> {
    if state.forms.discard(draft_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(draft_not_found(draft_id))
    }
}

// ---------------------------------------------------------------------------
// Staged media
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/drafts/{draft_id}/media
///
/// Multipart: every part with a file name is staged. A text part named
/// `alt` sets the alt text of the files that follow it.
pub async fn stage_media(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<DraftView>>)> {
    let mut files = Vec::new();
    let mut alt: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(file_name) = field.file_name().map(str::to_string) else {
            if field.name() == Some("alt") {
                alt = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                );
            }
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        files.push((
            StagedFile {
                file_name,
                content_type,
                bytes,
            },
            alt.clone(),
        ));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(
            "No files received in multipart upload".to_string(),
        ));
    }

    let view = state
        .forms
        .add_local_media(draft_id, files)
        .await
        .ok_or_else(|| draft_not_found(draft_id))?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

/// GET /api/v1/admin/drafts/{draft_id}/media/{key}
pub async fn preview_media(
    State(state): State<AppState>,
    Path((draft_id, key)): Path<(DraftId, PreviewKey)>,
) -> AppResult<Response> {
    let file = state.forms.preview(draft_id, key).await.ok_or_else(|| {
        AppError::Core(huma_core::error::CoreError::NotFound {
            entity: "Preview",
            id: key.to_string(),
        })
    })?;
    Ok(([(CONTENT_TYPE, file.content_type)], file.bytes).into_response())
}

/// DELETE /api/v1/admin/drafts/{draft_id}/media/{key}
pub async fn remove_media(
    State(state): State<AppState>,
    Path((draft_id, key)): Path<(DraftId, PreviewKey)>,
) -> AppResult<Json<DataResponse<DraftView>>> {
    let removed = state
        .forms
        .remove_media(draft_id, key)
        .await
        .ok_or_else(|| draft_not_found(draft_id))?;
    if !removed {
        return Err(AppError::Core(huma_core::error::CoreError::NotFound {
            entity: "Media",
            id: key.to_string(),
        }));
    }
    let view = state
        .forms
        .view(draft_id)
        .await
        .ok_or_else(|| draft_not_found(draft_id))?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/drafts/{draft_id}/submit
///
/// The submission runs detached, so a request timeout answers 408 while the
/// write still completes and closes the draft.
pub async fn submit_draft(
    State(state): State<AppState>,
    Path(draft_id): Path<DraftId>,
) -> AppResult<Json<DataResponse<SubmitOutcome>>> {
    let outcome = state.forms.submit_detached(draft_id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Suggestions
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SuggestInput {
    /// Write the suggestion into this draft as well.
    pub draft_id: Option<DraftId>,
    pub name: Option<String>,
    pub keywords: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub short_description: String,
}

/// POST /api/v1/admin/suggest-description
pub async fn suggest_description(
    State(state): State<AppState>,
    Json(input): Json<SuggestInput>,
) -> AppResult<Json<DataResponse<Suggestion>>> {
    let short_description = state
        .forms
        .suggest_short_description(input.draft_id, input.name, input.keywords)
        .await?;
    Ok(Json(DataResponse {
        data: Suggestion { short_description },
    }))
}
