// Background cache refresh.
// Rebuilds the snapshot from the origin on a fixed delay and swaps it into the store.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, Snapshot};
use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;

/// Runs refresh cycles: fetch, flatten, rank, replace.
pub struct Refresher {
    client: GitHubClient,
    store: Arc<CacheStore>,
    org: String,
    page_size: u32,
    interval: Duration,
}

impl Refresher {
    pub fn new(config: &Config, client: GitHubClient, store: Arc<CacheStore>) -> Self {
        Self {
            client,
            store,
            org: config.org.clone(),
            page_size: config.page_size,
            interval: config.refresh_interval,
        }
    }

    /// Fetch all four resources and derive a new snapshot. Nothing is
    /// published if any fetch fails.
    pub async fn build_snapshot(&self) -> Result<Snapshot> {
        let root = self.client.get_root(self.page_size).await?;
        let org = self.client.get_org(&self.org, self.page_size).await?;
        let repos = self.client.get_org_repos(&self.org, self.page_size).await?;
        let members = self
            .client
            .get_org_members(&self.org, self.page_size)
            .await?;
        Ok(Snapshot::new(root, org, members, repos))
    }

    /// Run one refresh cycle, replacing the stored snapshot on success.
    pub async fn refresh(&self) -> Result<()> {
        let started = Instant::now();
        let snapshot = self.build_snapshot().await?;
        let (repos, members) = (snapshot.repos.len(), snapshot.members.len());
        self.store.replace(snapshot);
        debug!(
            org = %self.org,
            repos,
            members,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "cache refreshed"
        );
        Ok(())
    }

    /// Start the refresh loop on its own task. The first cycle runs
    /// immediately; each later one starts `interval` after the previous ended.
    pub fn spawn(self) -> RefreshHandle {
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));
        RefreshHandle { shutdown, task }
    }

    async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!(org = %self.org, interval_secs = self.interval.as_secs_f64(), "refresh loop started");
        let mut consecutive_failures: u32 = 0;

        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                result = self.refresh() => match result {
                    Ok(()) => {
                        if consecutive_failures > 0 {
                            info!(after_failures = consecutive_failures, "refresh recovered");
                        }
                        consecutive_failures = 0;
                    }
                    Err(err) => {
                        consecutive_failures += 1;
                        warn!(
                            error = %err,
                            consecutive_failures,
                            "refresh failed, keeping current snapshot"
                        );
                    }
                },
            }

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }

        info!("refresh loop stopped");
    }
}

/// Owner of a running refresh loop.
pub struct RefreshHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stop the loop and wait for it to exit. An in-flight cycle is dropped
    /// without touching the store.
    pub async fn stop(self) {
        self.shutdown.send_replace(true);
        if let Err(err) = self.task.await {
            warn!(error = %err, "refresh task ended abnormally");
        }
    }
}
