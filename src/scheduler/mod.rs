//! Periodic refresh scheduling.
//!
//! # Responsibilities
//! - Drive each lister's refresh on the configured cadence
//! - Spread initial refreshes so sources do not reload in lockstep
//! - Keep refresh failures non-fatal; the previous snapshot keeps serving
//!
//! # Design Decisions
//! - One task per source: a slow or failing source never delays the others
//! - Refresh is serialized per lister by the lister itself; the scheduler
//!   only provides cadence

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time;

use crate::discovery::{Lister, Provider};
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Drives periodic refreshes for every lister owned by a provider.
pub struct RefreshScheduler {
    provider: Arc<Provider>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(provider: Arc<Provider>, interval: Duration) -> Self {
        Self { provider, interval }
    }

    /// Spawn one refresh loop per source. Each loop starts at a random
    /// offset within the first interval, then ticks at the configured
    /// cadence until shutdown.
    pub fn start(self, shutdown: &Shutdown) {
        tracing::info!(
            sources = self.provider.source_count(),
            interval_secs = self.interval.as_secs(),
            "Refresh scheduler starting"
        );
        for lister in self.provider.listers() {
            tokio::spawn(refresh_loop(lister, self.interval, shutdown.subscribe()));
        }
    }
}

async fn refresh_loop(
    lister: Arc<Lister>,
    interval: Duration,
    mut shutdown: broadcast::Receiver<()>,
) {
    let jitter = Duration::from_millis(fastrand::u64(0..interval.as_millis().max(1) as u64));
    tokio::select! {
        _ = time::sleep(jitter) => {}
        _ = shutdown.recv() => return,
    }

    let mut ticker = time::interval(interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match lister.refresh() {
                    Ok(reloaded) => {
                        metrics::record_refresh(lister.path(), reloaded);
                        if reloaded {
                            metrics::record_cache_size(lister.path(), lister.resource_count());
                        }
                    }
                    Err(error) => {
                        metrics::record_refresh_error(lister.path());
                        tracing::warn!(
                            path = %lister.path().display(),
                            %error,
                            "Refresh failed, serving previous snapshot"
                        );
                    }
                }
            }
            _ = shutdown.recv() => {
                tracing::debug!(path = %lister.path().display(), "Refresh loop exiting");
                break;
            }
        }
    }
}
