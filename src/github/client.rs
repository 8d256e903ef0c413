// Origin API HTTP client.
// Handles authentication, rate limit accounting, and request forwarding.

use reqwest::{
    Body, Client, Method, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
    redirect::Policy,
};
use tracing::debug;

use crate::config::Config;
use crate::error::{CacheError, Result};

use super::types::RateLimit;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// Client for the origin API. Cheap to clone; clones share the connection pools.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    /// Used by `forward`. Never follows redirects, so a 3xx reaches the caller as sent.
    passthrough: Client,
    origin: String,
}

impl GitHubClient {
    /// Create a client for `origin` that authenticates with the given token.
    pub fn new(token: &str, origin: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| CacheError::Config(format!("invalid token: {}", e)))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("org-cache"));

        let client = Client::builder()
            .default_headers(headers.clone())
            .build()
            .map_err(|e| CacheError::Config(format!("http client: {}", e)))?;
        let passthrough = Client::builder()
            .default_headers(headers)
            .redirect(Policy::none())
            .build()
            .map_err(|e| CacheError::Config(format!("http client: {}", e)))?;

        Ok(Self {
            client,
            passthrough,
            origin: origin.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.token, &config.origin)
    }

    /// Base URL of the origin API.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// GET an absolute URL, failing on any non-success status.
    pub async fn get_url(&self, url: &str) -> Result<Response> {
        let response = self.client.get(url).send().await?;
        let rate_limit = RateLimit::from_headers(response.headers());
        if let Some(rate_limit) = &rate_limit {
            debug!(
                url,
                remaining = rate_limit.remaining,
                limit = rate_limit.limit,
                "origin rate limit"
            );
        }
        check_response(response, rate_limit).await
    }

    /// Send a request to the origin unchanged apart from the credential.
    /// The response is returned whatever its status.
    pub async fn forward(
        &self,
        method: Method,
        path_and_query: &str,
        mut headers: HeaderMap,
        body: impl Into<Body>,
    ) -> Result<Response> {
        // The configured credential always wins over whatever the caller sent.
        headers.remove(AUTHORIZATION);

        let url = format!("{}{}", self.origin, path_and_query);
        let response = self
            .passthrough
            .request(method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await?;
        Ok(response)
    }
}

/// Check response status and convert errors.
async fn check_response(response: Response, rate_limit: Option<RateLimit>) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED => Err(CacheError::RemoteUnavailable(
            "authentication failed: invalid or expired token".to_string(),
        )),
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
            if rate_limit.as_ref().is_some_and(|r| r.remaining == 0) =>
        {
            let reset_at = rate_limit
                .map(|r| r.reset_at())
                .unwrap_or_else(|| "unknown".to_string());
            Err(CacheError::RemoteUnavailable(format!(
                "rate limit exceeded, resets at {}",
                reset_at
            )))
        }
        status => {
            let url = response.url().to_string();
            Err(CacheError::RemoteUnavailable(format!(
                "HTTP {} from {}: {}",
                status,
                url,
                response.text().await.unwrap_or_default()
            )))
        }
    }
}
