// Cache store holding the current snapshot.
// Readers load an Arc without locking; the refresher swaps in whole snapshots.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use tokio::sync::watch;
use tracing::info;

use crate::error::{CacheError, Result};

use super::snapshot::Snapshot;

/// Process-wide cache state. Empty until the first successful refresh.
pub struct CacheStore {
    current: ArcSwapOption<Snapshot>,
    ready: watch::Sender<bool>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            current: ArcSwapOption::empty(),
            ready,
        }
    }

    /// The current snapshot, or `NotReady` before the first refresh.
    /// Never blocks on a concurrent `replace`.
    pub fn read(&self) -> Result<Arc<Snapshot>> {
        self.current.load_full().ok_or(CacheError::NotReady)
    }

    /// Publish a new snapshot. Readers holding the previous one keep it until
    /// they drop it.
    pub fn replace(&self, snapshot: Snapshot) {
        let built_at = snapshot.built_at;
        let previous = self.current.swap(Some(Arc::new(snapshot)));
        if previous.is_none() {
            info!(%built_at, "first cache snapshot published");
        }
        self.ready.send_replace(true);
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Wait until a snapshot exists, giving up after `timeout`.
    /// Returns whether the cache became ready.
    pub async fn wait_ready(&self, timeout: Duration) -> bool {
        let mut ready = self.ready.subscribe();
        tokio::time::timeout(timeout, ready.wait_for(|r| *r))
            .await
            .is_ok_and(|waited| waited.is_ok())
    }
}
