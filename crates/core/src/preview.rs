//! Staged uploads awaiting submission.
//!
//! Staged bytes are owned by the registry and keyed by a random id. Each entry
//! is tied to exactly one [`PreviewHandle`]; dropping the handle releases the
//! bytes, so removing an item from a draft or discarding the draft frees its
//! previews without explicit bookkeeping.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use uuid::Uuid;

use crate::record::MediaKind;

/// Identifies one staged file.
pub type PreviewKey = Uuid;

/// A locally selected file that has not been uploaded yet.
#[derive(Debug, Clone)]
pub struct StagedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl StagedFile {
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_content_type(&self.content_type)
    }
}

type Entries = HashMap<PreviewKey, StagedFile>;

/// Shared store of staged files, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    entries: Arc<Mutex<Entries>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stage a file and return the handle that owns it.
    pub fn stage(&self, file: StagedFile) -> PreviewHandle {
        let key = Uuid::new_v4();
        self.lock().insert(key, file);
        tracing::debug!(%key, "Staged preview");
        PreviewHandle {
            key,
            registry: self.clone(),
        }
    }

    /// The staged file behind `key`, if it is still held.
    pub fn get(&self, key: &PreviewKey) -> Option<StagedFile> {
        self.lock().get(key).cloned()
    }

    pub fn contains(&self, key: &PreviewKey) -> bool {
        self.lock().contains_key(key)
    }

    /// Number of files currently staged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn release(&self, key: &PreviewKey) {
        if self.lock().remove(key).is_some() {
            tracing::debug!(%key, "Released preview");
        }
    }
}

/// Owns one staged file; the file is released when the handle is dropped.
#[derive(Debug)]
pub struct PreviewHandle {
    key: PreviewKey,
    registry: PreviewRegistry,
}

impl PreviewHandle {
    pub fn key(&self) -> PreviewKey {
        self.key
    }

    /// The staged file. `None` only if the registry was cleared externally.
    pub fn file(&self) -> Option<StagedFile> {
        self.registry.get(&self.key)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}
