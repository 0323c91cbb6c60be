//! Admin form workflow: draft registry and submission.

pub mod controller;
pub mod registry;

pub use controller::{FormController, SubmitOutcome};
pub use registry::DraftRegistry;

use huma_core::form::{DraftId, ValidationError};

/// Why a draft could not be submitted.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// Inputs did not validate; nothing was uploaded or written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A staged file failed to upload. Files uploaded before it stay in the bucket.
    #[error("Error al subir archivo {file}: {message}")]
    Upload { file: String, message: String },

    /// The row write failed; the draft is kept for another attempt.
    #[error("Error al guardar proyecto: {0}")]
    Persist(String),

    #[error("Draft {0} not found")]
    DraftNotFound(DraftId),

    /// Another submission of the same draft has not finished yet.
    #[error("Draft {0} is already being submitted")]
    InProgress(DraftId),

    /// The submission task panicked or was cancelled by shutdown.
    #[error("Submission task failed: {0}")]
    Interrupted(String),
}
