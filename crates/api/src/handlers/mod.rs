pub mod admin;
pub mod chat;
pub mod home;
pub mod map;
pub mod projects;

use huma_core::error::CoreError;
use huma_core::record::ProjectRecord;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Look up a project in the current store snapshot, or 404.
pub(crate) fn find_project(state: &AppState, id: &str) -> AppResult<ProjectRecord> {
    state.store.find(id).ok_or_else(|| {
        AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: id.to_string(),
        })
    })
}
