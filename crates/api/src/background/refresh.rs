//! Periodic project list refresh.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use huma_db::ProjectStore;

/// Refresh `store` every `period` until `cancel` is triggered.
///
/// The first tick is skipped because the server refreshes once at startup.
pub async fn run(store: Arc<ProjectStore>, period: Duration, cancel: CancellationToken) {
    tracing::info!(interval_secs = period.as_secs(), "Project refresh job started");

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Project refresh job stopping");
                break;
            }
            _ = interval.tick() => {
                let snapshot = store.refresh().await;
                match &snapshot.error {
                    None => tracing::debug!(projects = snapshot.records.len(), "Scheduled refresh done"),
                    Some(error) => tracing::warn!(%error, "Scheduled refresh failed"),
                }
            }
        }
    }
}
