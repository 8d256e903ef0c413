// Shared test fixtures: a mock origin serving one organization.

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{Value, json};

use crate::config::Config;

pub const ORG: &str = "Netflix";

pub fn config_for(server: &ServerGuard) -> Config {
    let mut config = Config::new("test-token");
    config.origin = server.url();
    config.org = ORG.to_string();
    config
}

pub fn sample_repos() -> Value {
    json!([
        {
            "full_name": "Netflix/A",
            "forks": 5,
            "open_issues": 2,
            "stargazers_count": 30,
            "updated_at": "2022-06-01T12:00:00Z",
            "owner": {"login": "Netflix"}
        },
        {
            "full_name": "Netflix/B",
            "forks": 1,
            "open_issues": 7,
            "updated_at": "2020-01-01T00:00:00Z",
            "owner": {"login": "Netflix"}
        },
        {
            "full_name": "Netflix/C",
            "forks": 9,
            "open_issues": 0,
            "stargazers_count": 3,
            "updated_at": "2024-03-15T08:30:00Z",
            "owner": {"login": "Netflix"}
        }
    ])
}

/// Mock the four cached resources. Keep the returned mocks alive for as long
/// as the origin should answer.
pub async fn mock_origin(server: &mut ServerGuard, repos: Value) -> Vec<Mock> {
    vec![
        server
            .mock("GET", Matcher::Regex(r"^/($|\?)".to_string()))
            .with_body(json!({"organization_url": "https://api.github.com/orgs/{org}"}).to_string())
            .create_async()
            .await,
        server
            .mock("GET", Matcher::Regex(format!(r"^/orgs/{}($|\?)", ORG)))
            .with_body(json!({"login": ORG, "plan": {"name": "free"}}).to_string())
            .create_async()
            .await,
        server
            .mock("GET", Matcher::Regex(format!(r"^/orgs/{}/members", ORG)))
            .with_body(json!([{"login": "octocat", "site_admin": false}]).to_string())
            .create_async()
            .await,
        server
            .mock("GET", Matcher::Regex(format!(r"^/orgs/{}/repos", ORG)))
            .with_body(repos.to_string())
            .create_async()
            .await,
    ]
}

/// Mock every cached resource as failing.
pub async fn mock_outage(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", Matcher::Any)
        .with_status(503)
        .with_body("{\"message\":\"down\"}")
        .create_async()
        .await
}

pub async fn remove_all(mocks: Vec<Mock>) {
    for mock in mocks {
        mock.remove_async().await;
    }
}
