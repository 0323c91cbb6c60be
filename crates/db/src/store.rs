//! The in-memory project list shared by every page.
//!
//! The list lives in a [`tokio::sync::watch`] channel: `refresh()` builds a
//! complete new [`ProjectSnapshot`] and swaps it in with one send, so readers
//! always see either the previous list or the new one, never a mix.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use huma_core::fallback::sample_projects;
use huma_core::normalize::{normalize_all, Normalized, MISSING_ID};
use huma_core::record::ProjectRecord;
use huma_core::types::Timestamp;

use crate::error::TransportError;
use crate::remote::ProjectTable;

/// Prefix of the message exposed when a refresh fails.
pub const LOAD_ERROR_PREFIX: &str = "Error al cargar proyectos";

/// Where the current list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListOrigin {
    /// No refresh has completed yet.
    Pending,
    /// Rows fetched from the table.
    Remote,
    /// The built-in sample list, used because the first load failed.
    Fallback,
}

/// One immutable view of the project list.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSnapshot {
    /// Newest-created first.
    pub records: Vec<ProjectRecord>,
    /// Human-readable message of the last failed refresh, if it failed.
    pub error: Option<String>,
    pub origin: ListOrigin,
    /// Completion time of the last refresh attempt.
    pub refreshed_at: Option<Timestamp>,
    /// Records that needed at least one fallback during normalization.
    pub degraded: usize,
    /// Incremented on every publish; `0` until the first refresh completes.
    pub version: u64,
}

impl ProjectSnapshot {
    fn pending() -> Self {
        Self {
            records: Vec::new(),
            error: None,
            origin: ListOrigin::Pending,
            refreshed_at: None,
            degraded: 0,
            version: 0,
        }
    }

    pub fn find(&self, id: &str) -> Option<&ProjectRecord> {
        self.records.iter().find(|r| r.id == id)
    }
}

/// Holds the current project list and refreshes it from the table.
pub struct ProjectStore {
    table: Arc<dyn ProjectTable>,
    tx: watch::Sender<ProjectSnapshot>,
}

impl ProjectStore {
    pub fn new(table: Arc<dyn ProjectTable>) -> Self {
        let (tx, _rx) = watch::channel(ProjectSnapshot::pending());
        Self { table, tx }
    }

    /// Fetch and normalize every row without touching the stored list.
    ///
    /// Rows without a usable id get a position-derived one so ids stay unique.
    pub async fn fetch(&self) -> Result<Vec<Normalized>, TransportError> {
        let rows = self.table.select_all().await?;
        let mut normalized = normalize_all(&rows);
        for (position, item) in normalized.iter_mut().enumerate() {
            if item.record.id == MISSING_ID {
                item.record.id = format!("{MISSING_ID}-{position}");
            }
        }
        Ok(normalized)
    }

    /// Reload the list from the table.
    ///
    /// Never fails. On a transport error the store keeps its last good list,
    /// or falls back to the sample list if it never loaded, and records the
    /// error message in the snapshot.
    pub async fn refresh(&self) -> ProjectSnapshot {
        let result = self.fetch().await;
        let now = chrono::Utc::now();

        let next = match result {
            Ok(normalized) => {
                let degraded = normalized.iter().filter(|n| !n.report.is_clean()).count();
                for item in normalized.iter().filter(|n| !n.report.is_clean()) {
                    tracing::debug!(
                        project_id = %item.record.id,
                        fields = ?item.report.degraded_fields(),
                        "Project row normalized with fallbacks"
                    );
                }
                let records: Vec<ProjectRecord> =
                    normalized.into_iter().map(|n| n.record).collect();
                tracing::info!(count = records.len(), degraded, "Project list refreshed");
                ProjectSnapshot {
                    records,
                    error: None,
                    origin: ListOrigin::Remote,
                    refreshed_at: Some(now),
                    degraded,
                    version: 0,
                }
            }
            Err(e) => {
                let message = format!("{LOAD_ERROR_PREFIX}: {e}");
                let current = self.tx.borrow().clone();
                if current.origin == ListOrigin::Remote {
                    tracing::warn!(error = %e, "Project refresh failed, keeping last good list");
                    ProjectSnapshot {
                        error: Some(message),
                        refreshed_at: Some(now),
                        ..current
                    }
                } else {
                    tracing::warn!(error = %e, "Project load failed, using sample list");
                    ProjectSnapshot {
                        records: sample_projects(),
                        error: Some(message),
                        origin: ListOrigin::Fallback,
                        refreshed_at: Some(now),
                        degraded: 0,
                        version: 0,
                    }
                }
            }
        };

        let mut published = next;
        self.tx.send_modify(|current| {
            published.version = current.version + 1;
            *current = published.clone();
        });
        published
    }

    /// The latest snapshot.
    pub fn current(&self) -> ProjectSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every refresh.
    pub fn subscribe(&self) -> watch::Receiver<ProjectSnapshot> {
        self.tx.subscribe()
    }

    /// Look up a record in the latest snapshot.
    pub fn find(&self, id: &str) -> Option<ProjectRecord> {
        self.tx.borrow().find(id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use huma_core::row::{ProjectRow, ProjectRowPayload};
    use huma_core::types::ProjectId;

    /// Serves queued responses in order, repeating the last one.
    struct ScriptedTable {
        responses: Mutex<Vec<Result<Vec<ProjectRow>, u16>>>,
    }

    impl ScriptedTable {
        fn new(responses: Vec<Result<Vec<ProjectRow>, u16>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
            })
        }
    }

    #[async_trait]
    impl ProjectTable for ScriptedTable {
        async fn select_all(&self) -> Result<Vec<ProjectRow>, TransportError> {
            let mut responses = self.responses.lock().unwrap();
            let next = if responses.len() > 1 {
                responses.remove(0)
            } else {
                responses[0].clone()
            };
            next.map_err(|status| TransportError::Api {
                status,
                body: "boom".into(),
            })
        }

        async fn insert(&self, _row: &ProjectRowPayload) -> Result<(), TransportError> {
            Ok(())
        }

        async fn update(&self, _id: &ProjectId, _row: &ProjectRowPayload) -> Result<(), TransportError> {
            Ok(())
        }
    }

    fn row(id: i64, name: &str) -> ProjectRow {
        ProjectRow {
            id: Some(serde_json::json!(id)),
            nombre: Some(serde_json::json!(name)),
            coordinates: Some(serde_json::json!([-32.9, -68.8])),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn starts_pending_and_empty() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Ok(vec![])]));
        let snapshot = store.current();
        assert_eq!(snapshot.origin, ListOrigin::Pending);
        assert!(snapshot.records.is_empty());
    }

    #[tokio::test]
    async fn refresh_replaces_list_in_table_order() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Ok(vec![
            row(2, "Nuevo"),
            row(1, "Viejo"),
        ])]));
        let snapshot = store.refresh().await;

        assert_eq!(snapshot.origin, ListOrigin::Remote);
        assert_eq!(snapshot.error, None);
        let ids: Vec<_> = snapshot.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["2", "1"]);
        assert_eq!(store.find("1").unwrap().name, "Viejo");
    }

    #[tokio::test]
    async fn first_failure_falls_back_to_sample_list() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Err(500)]));
        let snapshot = store.refresh().await;

        assert_eq!(snapshot.origin, ListOrigin::Fallback);
        assert_eq!(snapshot.records, sample_projects());
        let error = snapshot.error.unwrap();
        assert!(error.starts_with("Error al cargar proyectos: "), "{error}");
    }

    #[tokio::test]
    async fn later_failure_keeps_last_good_list() {
        let store = ProjectStore::new(ScriptedTable::new(vec![
            Ok(vec![row(1, "Arenas")]),
            Err(503),
        ]));
        store.refresh().await;
        let snapshot = store.refresh().await;

        assert_eq!(snapshot.origin, ListOrigin::Remote);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].name, "Arenas");
        assert!(snapshot.error.is_some());
    }

    #[tokio::test]
    async fn missing_ids_are_made_unique_by_position() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Ok(vec![
            ProjectRow::default(),
            ProjectRow::default(),
        ])]));
        let snapshot = store.refresh().await;

        assert_eq!(snapshot.records[0].id, "sin-id-0");
        assert_eq!(snapshot.records[1].id, "sin-id-1");
        assert_eq!(snapshot.degraded, 2);
    }

    #[tokio::test]
    async fn subscribers_see_each_refresh() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Ok(vec![row(1, "A")])]));
        let mut rx = store.subscribe();

        store.refresh().await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().records.len(), 1);
    }

    #[tokio::test]
    async fn every_refresh_bumps_version() {
        let store = ProjectStore::new(ScriptedTable::new(vec![Ok(vec![]), Err(500)]));
        assert_eq!(store.current().version, 0);
        assert_eq!(store.refresh().await.version, 1);
        assert_eq!(store.refresh().await.version, 2);
    }
}
