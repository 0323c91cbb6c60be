//! Keeps the marker layer in step with the project store.
//!
//! Every published snapshot clears and re-renders the layer, so markers from
//! an earlier list never survive a refresh.

use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tokio_util::sync::CancellationToken;

use huma_db::ProjectSnapshot;

use crate::map_layer::MapLayer;

/// Re-render `map` whenever the store publishes. Runs until `cancel` fires or
/// the store is dropped.
pub async fn run(
    mut snapshots: watch::Receiver<ProjectSnapshot>,
    map: Arc<RwLock<MapLayer>>,
    cancel: CancellationToken,
) {
    tracing::info!("Map render task started");

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        map.write().await.sync(&snapshot);

        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Map render task stopping");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    tracing::debug!("Project store closed; map render task exiting");
                    break;
                }
            }
        }
    }
}
