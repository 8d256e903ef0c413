// Application wiring and lifecycle.
// Owns the cache store, starts the refresh loop, and runs the HTTP server until shutdown.

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::refresh::Refresher;
use crate::server::{self, AppState};

/// Main application state.
pub struct App {
    config: Config,
    client: GitHubClient,
    store: Arc<CacheStore>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = GitHubClient::from_config(&config)?;
        Ok(Self {
            config,
            client,
            store: Arc::new(CacheStore::new()),
        })
    }

    /// Shared cache store.
    pub fn store(&self) -> Arc<CacheStore> {
        Arc::clone(&self.store)
    }

    /// Bind the configured address and run until `shutdown` resolves.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind).await?;
        self.run_on(listener, shutdown).await
    }

    /// Run on an already bound listener. The refresh loop starts first and is
    /// stopped after the server has drained.
    pub async fn run_on(
        self,
        listener: TcpListener,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let refresher = Refresher::new(&self.config, self.client.clone(), self.store());
        let refresh = refresher.spawn();

        let state = AppState {
            store: self.store(),
            client: self.client.clone(),
            health_timeout: self.config.health_timeout,
        };
        let app = server::router(state, &self.config.org);

        let addr = listener.local_addr()?;
        info!(
            %addr,
            origin = %self.config.origin,
            org = %self.config.org,
            "serving"
        );
        let served = server::serve(listener, app, shutdown).await;

        refresh.stop().await;
        served
    }
}
