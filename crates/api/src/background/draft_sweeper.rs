//! Periodic eviction of abandoned admin drafts.
//!
//! A draft nobody has read or edited for the idle limit is discarded, which
//! releases the bytes of every file it staged.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::forms::FormController;

/// Sweep `forms` every `period`, dropping drafts idle for longer than
/// `max_idle`. Runs until `cancel` is triggered.
pub async fn run(
    forms: Arc<FormController>,
    max_idle: Duration,
    period: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        idle_secs = max_idle.as_secs(),
        interval_secs = period.as_secs(),
        "Draft sweeper started"
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Draft sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                let evicted = forms.evict_idle_drafts(max_idle).await;
                if evicted > 0 {
                    let open = forms.drafts().len().await;
                    tracing::info!(evicted, open, "Draft sweeper: discarded idle drafts");
                } else {
                    tracing::debug!("Draft sweeper: nothing to discard");
                }
            }
        }
    }
}

/// Sweep often enough that a draft outlives its idle limit by at most a quarter of it.
pub fn sweep_period(max_idle: Duration) -> Duration {
    (max_idle / 4).max(Duration::from_secs(1))
}
