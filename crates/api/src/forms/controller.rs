//! Draft lifecycle and submission against the hosted table and bucket.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

use huma_assistant::ChatModel;
use huma_core::chat::short_description_prompt;
use huma_core::form::{
    upload_path, DraftId, DraftUpdate, DraftView, PlannedMedia, ProjectDraft,
};
use huma_core::preview::{PreviewKey, PreviewRegistry, StagedFile};
use huma_core::record::{MediaItem, ProjectRecord};
use huma_db::{ObjectStorage, ProjectStore, ProjectTable};

use crate::error::{AppError, AppResult};
use crate::forms::registry::DraftRegistry;
use crate::forms::SubmitError;

/// Result of a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitOutcome {
    pub created: bool,
    pub message: String,
    /// Media as written to the row, in display order.
    pub media: Vec<MediaItem>,
    /// Store version published by the post-submit refresh.
    pub store_version: u64,
}

/// Owns open drafts and their staged files, and writes drafts back.
pub struct FormController {
    drafts: DraftRegistry,
    previews: PreviewRegistry,
    table: Arc<dyn ProjectTable>,
    storage: Arc<dyn ObjectStorage>,
    store: Arc<ProjectStore>,
    assistant: Option<Arc<dyn ChatModel>>,
    submitting: Mutex<HashSet<DraftId>>,
}

/// Held while a draft is being submitted; released on drop.
struct SubmitClaim<'a> {
    controller: &'a FormController,
    id: DraftId,
}

impl Drop for SubmitClaim<'_> {
    fn drop(&mut self) {
        self.controller.submitting().remove(&self.id);
    }
}

impl FormController {
    pub fn new(
        table: Arc<dyn ProjectTable>,
        storage: Arc<dyn ObjectStorage>,
        store: Arc<ProjectStore>,
        assistant: Option<Arc<dyn ChatModel>>,
    ) -> Self {
        Self {
            drafts: DraftRegistry::new(),
            previews: PreviewRegistry::new(),
            table,
            storage,
            store,
            assistant,
            submitting: Mutex::default(),
        }
    }

    fn submitting(&self) -> MutexGuard<'_, HashSet<DraftId>> {
        self.submitting.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn claim(&self, id: DraftId) -> Option<SubmitClaim<'_>> {
        self.submitting()
            .insert(id)
            .then(|| SubmitClaim { controller: self, id })
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn drafts(&self) -> &DraftRegistry {
        &self.drafts
    }

    // ---- draft lifecycle ----

    pub async fn open_create(&self) -> DraftView {
        self.open(ProjectDraft::open_create()).await
    }

    pub async fn open_edit(&self, record: &ProjectRecord) -> DraftView {
        self.open(ProjectDraft::open_edit(record)).await
    }

    async fn open(&self, draft: ProjectDraft) -> DraftView {
        let view = draft.view();
        let id = self.drafts.insert(draft).await;
        tracing::info!(draft_id = %id, edit = view.original_id.is_some(), "Draft opened");
        view
    }

    pub async fn view(&self, id: DraftId) -> Option<DraftView> {
        self.drafts.with(id, |d| d.view()).await
    }

    pub async fn update(&self, id: DraftId, update: DraftUpdate) -> Option<DraftView> {
        self.drafts
            .with(id, |d| {
                d.apply(update);
                d.view()
            })
            .await
    }

    /// Stage files on a draft. Never touches the remote store.
    pub async fn add_local_media(
        &self,
        id: DraftId,
        files: Vec<(StagedFile, Option<String>)>,
    ) -> Option<DraftView> {
        self.drafts
            .with(id, |d| {
                for (file, alt) in files {
                    let key = d.add_local_media(&self.previews, file, alt);
                    tracing::debug!(draft_id = %d.id, %key, "Media staged");
                }
                d.view()
            })
            .await
    }

    /// Staged bytes of an item, if it belongs to the draft and is still staged.
    pub async fn preview(&self, id: DraftId, key: PreviewKey) -> Option<StagedFile> {
        let owned = self
            .drafts
            .with(id, |d| d.media.iter().any(|m| m.key == key && m.is_staged()))
            .await?;
        owned.then(|| self.previews.get(&key)).flatten()
    }

    /// Remove an item; staged bytes are released. `None` if the draft is unknown.
    pub async fn remove_media(&self, id: DraftId, key: PreviewKey) -> Option<bool> {
        self.drafts.with(id, |d| d.remove_media(key)).await
    }

    /// Drop a draft and release all of its previews.
    pub async fn discard(&self, id: DraftId) -> bool {
        let removed = self.drafts.remove(id).await.is_some();
        if removed {
            tracing::info!(draft_id = %id, "Draft discarded");
        }
        removed
    }

    /// Discard drafts left untouched for longer than `max_idle`.
    pub async fn evict_idle_drafts(&self, max_idle: Duration) -> usize {
        let evicted = self.drafts.evict_idle(max_idle).await;
        for id in &evicted {
            tracing::info!(draft_id = %id, "Idle draft discarded");
        }
        evicted.len()
    }

    // ---- submission ----

    /// Validate, upload staged media in order, write the row and refresh.
    ///
    /// Validation failures make no network call. An upload failure aborts at
    /// that file; files uploaded before it are left in the bucket. On any
    /// failure the draft stays open. A second call for a draft whose
    /// submission is still running is refused with [`SubmitError::InProgress`].
    pub async fn submit(&self, id: DraftId) -> Result<SubmitOutcome, SubmitError> {
        let _claim = self.claim(id).ok_or(SubmitError::InProgress(id))?;
        let plan = self
            .drafts
            .with(id, |d| d.plan_submit())
            .await
            .ok_or(SubmitError::DraftNotFound(id))??;

        let mut media = Vec::with_capacity(plan.media.len());
        for item in &plan.media {
            match item {
                PlannedMedia::Ready(existing) => media.push(existing.clone()),
                PlannedMedia::Upload {
                    file,
                    kind,
                    alt_text,
                } => {
                    let path = upload_path(&file.file_name, chrono::Utc::now().timestamp_millis());
                    self.storage
                        .upload(&path, &file.content_type, file.bytes.clone())
                        .await
                        .map_err(|e| {
                            tracing::warn!(draft_id = %id, file = %file.file_name, error = %e, "Upload failed");
                            SubmitError::Upload {
                                file: file.file_name.clone(),
                                message: e.to_string(),
                            }
                        })?;
                    media.push(MediaItem {
                        kind: *kind,
                        source_url: self.storage.public_url(&path),
                        alt_text: alt_text.clone(),
                    });
                }
            }
        }

        let original_id = plan.original_id.clone();
        let name = plan.fields.nombre.clone();
        let payload = plan.into_payload(&media);

        let written = match &original_id {
            Some(project_id) => self.table.update(project_id, &payload).await,
            None => self.table.insert(&payload).await,
        };
        written.map_err(|e| {
            tracing::warn!(draft_id = %id, error = %e, "Project write failed");
            SubmitError::Persist(e.to_string())
        })?;

        self.drafts.remove(id).await;
        let snapshot = self.store.refresh().await;

        let created = original_id.is_none();
        let verb = if created { "agregado" } else { "actualizado" };
        tracing::info!(draft_id = %id, created, media = media.len(), "Project saved");

        Ok(SubmitOutcome {
            created,
            message: format!("Proyecto \"{name}\" {verb} correctamente."),
            media,
            store_version: snapshot.version,
        })
    }

    /// [`submit`](Self::submit) on its own task. Dropping the caller (a request
    /// timeout or a closed connection) cannot stop it between the row write
    /// and closing the draft.
    pub async fn submit_detached(self: &Arc<Self>, id: DraftId) -> Result<SubmitOutcome, SubmitError> {
        let forms = Arc::clone(self);
        tokio::spawn(async move { forms.submit(id).await })
            .await
            .map_err(|e| SubmitError::Interrupted(e.to_string()))?
    }

    // ---- assistant ----

    /// Ask the assistant for a short map description.
    ///
    /// With a draft id, the suggestion is also written into that draft and the
    /// draft's name and keywords fill in whatever the caller left out.
    pub async fn suggest_short_description(
        &self,
        draft: Option<DraftId>,
        name: Option<String>,
        keywords: Option<String>,
    ) -> AppResult<String> {
        let assistant = self
            .assistant
            .as_ref()
            .ok_or(AppError::AssistantUnavailable)?;

        let (name, keywords) = match draft {
            Some(id) => self
                .drafts
                .with(id, |d| {
                    (
                        name.clone().unwrap_or_else(|| d.name.clone()),
                        keywords.clone().unwrap_or_else(|| d.ai_keywords.clone()),
                    )
                })
                .await
                .ok_or_else(|| draft_not_found(id))?,
            None => (name.unwrap_or_default(), keywords.unwrap_or_default()),
        };

        if name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Por favor, ingrese un nombre de proyecto para generar la descripción.".into(),
            ));
        }

        let suggestion = assistant
            .generate(&short_description_prompt(&name, &keywords))
            .await?;

        if let Some(id) = draft {
            self.drafts
                .with(id, |d| d.short_description = suggestion.clone())
                .await;
        }
        Ok(suggestion)
    }
}

/// 404 for an unknown draft id.
pub fn draft_not_found(id: DraftId) -> AppError {
    AppError::Core(huma_core::error::CoreError::NotFound {
        entity: "Draft",
        id: id.to_string(),
    })
}
