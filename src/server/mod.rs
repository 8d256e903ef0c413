// HTTP front end.
// Serves cached endpoints from the snapshot store and proxies everything else to the origin.

pub mod proxy;
pub mod routes;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{any, get},
};
use serde_json::json;
use tokio::net::TcpListener;

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::github::GitHubClient;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<CacheStore>,
    pub client: GitHubClient,
    pub health_timeout: Duration,
}

/// Build the router. Only `org`'s endpoints are served from the cache; the
/// fallback forwards all other paths to the origin.
pub fn router(state: AppState, org: &str) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route(&format!("/orgs/{}", org), get(routes::org))
        .route(&format!("/orgs/{}/members", org), get(routes::members))
        .route(&format!("/orgs/{}/repos", org), get(routes::repos))
        .route("/healthcheck", get(routes::healthcheck))
        .route("/view/bottom/:n/:metric", any(routes::bottom))
        .fallback(proxy::forward)
        .with_state(state)
}

/// Serve `app` until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotReady => StatusCode::SERVICE_UNAVAILABLE,
            CacheError::RemoteUnavailable(_) | CacheError::RemoteFormat(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "message": self.to_string() }))).into_response()
    }
}
