//! Collaborator contracts for the hosted backend.
//!
//! The API holds these as `Arc<dyn ...>` so tests can swap in in-memory
//! fakes for the REST client.

use async_trait::async_trait;
use bytes::Bytes;

use huma_core::row::{ProjectRow, ProjectRowPayload};
use huma_core::types::ProjectId;

use crate::error::TransportError;

/// The `Proyectos` table.
#[async_trait]
pub trait ProjectTable: Send + Sync {
    /// Every row, newest `created_at` first.
    async fn select_all(&self) -> Result<Vec<ProjectRow>, TransportError>;

    async fn insert(&self, row: &ProjectRowPayload) -> Result<(), TransportError>;

    /// Update the row whose primary key equals `id`.
    async fn update(&self, id: &ProjectId, row: &ProjectRowPayload) -> Result<(), TransportError>;
}

/// The public media bucket.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Upload `bytes` to `path` without overwriting an existing object.
    async fn upload(
        &self,
        path: &str,
        content_type: &str,
        bytes: Bytes,
    ) -> Result<(), TransportError>;

    /// Public URL of an uploaded object. Pure; no request is made.
    fn public_url(&self, path: &str) -> String;
}
