//! Background expiry sweep.

use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use super::service::LinkCache;

/// Spawns a task that purges expired records every `purge_interval`.
///
/// The first sweep happens one full interval after the call. Each pass only
/// takes per-shard locks, so lookups keep running while it works. Returns the
/// task handle so the server can abort it on shutdown.
///
/// # Panics
///
/// Panics if `purge_interval` is zero; callers skip the sweeper in that case.
pub fn spawn_sweeper(cache: Arc<dyn LinkCache>, purge_interval: Duration) -> JoinHandle<()> {
    assert!(!purge_interval.is_zero(), "purge interval must be non-zero");

    tokio::spawn(async move {
        info!("Cache sweeper started (interval: {:?})", purge_interval);

        let mut ticker = tokio::time::interval(purge_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let removed = cache.purge_expired().await;
            if removed > 0 {
                counter!("link_cache_purged_total").increment(removed as u64);
                info!("Cache sweep: removed {} expired records", removed);
            } else {
                debug!("Cache sweep: no expired records");
            }
        }
    })
}
