use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use huma_core::form::{DraftId, ProjectDraft};

#[derive(Debug)]
struct Entry {
    draft: ProjectDraft,
    touched: Instant,
}

/// Open drafts keyed by id, with the time each was last used.
///
/// Removing a draft drops it, which releases every preview it staged.
#[derive(Debug, Default)]
pub struct DraftRegistry {
    drafts: Mutex<HashMap<DraftId, Entry>>,
}

impl DraftRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, draft: ProjectDraft) -> DraftId {
        let id = draft.id;
        let entry = Entry {
            draft,
            touched: Instant::now(),
        };
        self.drafts.lock().await.insert(id, entry);
        id
    }

    /// Run `f` against a draft and mark it used. `None` if the draft does not exist.
    pub async fn with<R>(&self, id: DraftId, f: impl FnOnce(&mut ProjectDraft) -> R) -> Option<R> {
        let mut drafts = self.drafts.lock().await;
        let entry = drafts.get_mut(&id)?;
        entry.touched = Instant::now();
        Some(f(&mut entry.draft))
    }

    pub async fn remove(&self, id: DraftId) -> Option<ProjectDraft> {
        self.drafts.lock().await.remove(&id).map(|entry| entry.draft)
    }

    /// Drop every draft unused for longer than `max_idle`. Returns the ids dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> Vec<DraftId> {
        let now = Instant::now();
        let mut drafts = self.drafts.lock().await;
        let idle: Vec<DraftId> = drafts
            .iter()
            .filter(|(_, entry)| now.duration_since(entry.touched) > max_idle)
            .map(|(id, _)| *id)
            .collect();
        for id in &idle {
            drafts.remove(id);
        }
        idle
    }

    pub async fn len(&self) -> usize {
        self.drafts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.drafts.lock().await.is_empty()
    }
}
