//! Expired Entry Purge Task
//!
//! Background task that periodically removes expired entries from the
//! in-memory engine.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{MemoryEngine, UserCache};

/// Spawns a background task that purges expired entries every
/// `cleanup_interval_secs` seconds.
///
/// Purging bypasses the facade's mutation calls, so the task drops the
/// statistics snapshots itself whenever it removes something.
///
/// Returns a JoinHandle that can be aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<UserCache<MemoryEngine>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting expired entry purge with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.backend().purge_expired();
            if removed > 0 {
                cache.invalidate_statistics();
                info!("Purge: removed {} expired entries", removed);
            } else {
                debug!("Purge: no expired entries found");
            }
        }
    })
}
