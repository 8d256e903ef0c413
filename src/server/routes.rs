// Cached endpoint handlers.
// Every handler reads the current snapshot once and never triggers a fetch.

use axum::{
    Json,
    extract::{Path, Request, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};

use crate::cache::Metric;
use crate::error::{CacheError, Result};

use super::{AppState, proxy};

/// `GET /`
pub async fn root(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.store.read()?;
    Ok(Json(&snapshot.root).into_response())
}

/// `GET /orgs/{org}`
pub async fn org(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.store.read()?;
    Ok(Json(&snapshot.org).into_response())
}

/// `GET /orgs/{org}/members`
pub async fn members(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.store.read()?;
    Ok(Json(&snapshot.members).into_response())
}

/// `GET /orgs/{org}/repos`
pub async fn repos(State(state): State<AppState>) -> Result<Response> {
    let snapshot = state.store.read()?;
    Ok(Json(&snapshot.repos).into_response())
}

/// `GET /healthcheck`: succeeds once the first snapshot exists, waiting up
/// to the configured timeout for it.
pub async fn healthcheck(State(state): State<AppState>) -> Response {
    if state.store.wait_ready(state.health_timeout).await {
        StatusCode::OK.into_response()
    } else {
        CacheError::NotReady.into_response()
    }
}

/// `GET /view/bottom/{n}/{metric}`: the `n` repos with the smallest metric,
/// ascending. Paths with a non-numeric `n`, an unknown metric, or segments
/// that do not decode to UTF-8 are not ranked views and go to the origin instead.
pub async fn bottom(
    State(state): State<AppState>,
    params: Option<Path<(String, String)>>,
    request: Request,
) -> Response {
    let view = params.and_then(|Path((n, metric))| parse_view(&n, &metric));
    let Some((n, metric)) = view else {
        return proxy::forward(State(state), request).await;
    };

    if *request.method() != Method::GET && *request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    match state.store.read() {
        Ok(snapshot) => Json(snapshot.rankings.index(metric).bottom(n)).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Parse the `{n}` and `{metric}` segments. `n` must be ASCII digits; values
/// too large for `usize` mean "everything".
fn parse_view(n: &str, metric: &str) -> Option<(usize, Metric)> {
    if n.is_empty() || !n.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let metric = Metric::from_slug(metric)?;
    let n = n.parse().unwrap_or(usize::MAX);
    Some((n, metric))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, Collection, Snapshot};
    use crate::github::GitHubClient;
    use crate::server::router;
    use crate::testing::{ORG, sample_repos};
    use axum::{Router, body::Body, http::Request as HttpRequest};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(store: Arc<CacheStore>) -> Router {
        let state = AppState {
            store,
            // Unroutable origin: any request that reaches it fails fast.
            client: GitHubClient::new("token", "http://127.0.0.1:1").unwrap(),
            health_timeout: Duration::from_millis(50),
        };
        router(state, ORG)
    }

    fn ready_store() -> Arc<CacheStore> {
        let repos = crate::cache::flatten::flatten(sample_repos()).unwrap();
        let org = crate::cache::flatten::flatten(json!({"login": ORG, "plan": {"seats": 4}})).unwrap();
        let root = crate::cache::flatten::flatten(json!({"current_user_url": "u"})).unwrap();
        let members = Collection::Many(Vec::new());

        let store = Arc::new(CacheStore::new());
        store.replace(Snapshot::new(root, org, members, repos));
        store
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(HttpRequest::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[test]
    fn test_parse_view() {
        assert_eq!(parse_view("2", "forks"), Some((2, Metric::Forks)));
        assert_eq!(parse_view("0", "stars"), Some((0, Metric::Stars)));
        assert_eq!(
            parse_view("99999999999999999999999", "open_issues"),
            Some((usize::MAX, Metric::OpenIssues))
        );
        assert_eq!(parse_view("-1", "forks"), None);
        assert_eq!(parse_view("two", "forks"), None);
        assert_eq!(parse_view("", "forks"), None);
        assert_eq!(parse_view("2", "watchers"), None);
    }

    #[tokio::test]
    async fn test_cached_endpoints_not_ready() {
        let store = Arc::new(CacheStore::new());
        for uri in [
            "/",
            "/orgs/Netflix",
            "/orgs/Netflix/members",
            "/orgs/Netflix/repos",
            "/view/bottom/3/forks",
            "/view/bottom/3/last_updated",
            "/view/bottom/3/open_issues",
            "/view/bottom/3/stars",
            "/healthcheck",
        ] {
            let (status, _) = get(app(Arc::clone(&store)), uri).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE, "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_healthcheck_after_ready() {
        let (status, body) = get(app(ready_store()), "/healthcheck").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[tokio::test]
    async fn test_healthcheck_waits_for_first_snapshot() {
        let store = Arc::new(CacheStore::new());
        let state = AppState {
            store: Arc::clone(&store),
            client: GitHubClient::new("token", "http://127.0.0.1:1").unwrap(),
            health_timeout: Duration::from_secs(5),
        };
        let pending = tokio::spawn(get(router(state, ORG), "/healthcheck"));

        tokio::time::sleep(Duration::from_millis(20)).await;
        let repos = Collection::Many(Vec::new());
        store.replace(Snapshot::new(
            Collection::default(),
            Collection::default(),
            Collection::default(),
            repos,
        ));

        let (status, _) = pending.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cached_collections() {
        let store = ready_store();

        let (status, body) = get(app(Arc::clone(&store)), "/orgs/Netflix").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"login": "Netflix", "plan.seats": 4}));

        let (_, body) = get(app(Arc::clone(&store)), "/orgs/Netflix/repos").await;
        let repos = body.as_array().unwrap();
        assert_eq!(repos.len(), 3);
        assert_eq!(repos[0]["owner.login"], json!("Netflix"));

        let (_, body) = get(app(Arc::clone(&store)), "/orgs/Netflix/members").await;
        assert_eq!(body, json!([]));

        let (_, body) = get(app(store), "/").await;
        assert_eq!(body, json!({"current_user_url": "u"}));
    }

    #[tokio::test]
    async fn test_bottom_views() {
        let store = ready_store();

        let (status, body) = get(app(Arc::clone(&store)), "/view/bottom/2/forks").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([["Netflix/B", 1], ["Netflix/A", 5]]));

        let (_, body) = get(app(Arc::clone(&store)), "/view/bottom/10/last_updated").await;
        assert_eq!(
            body,
            json!([
                ["Netflix/B", "2020-01-01T00:00:00Z"],
                ["Netflix/A", "2022-06-01T12:00:00Z"],
                ["Netflix/C", "2024-03-15T08:30:00Z"]
            ])
        );

        let (_, body) = get(app(Arc::clone(&store)), "/view/bottom/1/open_issues").await;
        assert_eq!(body, json!([["Netflix/C", 0]]));

        let (_, body) = get(app(Arc::clone(&store)), "/view/bottom/0/forks").await;
        assert_eq!(body, json!([]));

        // Netflix/B has no stargazers_count and never shows up.
        let (_, body) = get(app(store), "/view/bottom/50/stars").await;
        assert_eq!(body, json!([["Netflix/C", 3], ["Netflix/A", 30]]));
    }

    #[tokio::test]
    async fn test_non_get_on_cached_path() {
        let response = app(ready_store())
            .oneshot(
                HttpRequest::post("/view/bottom/2/forks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
