// Error types for org-cache.
// Covers origin API failures, cache readiness, and configuration errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Origin API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("Unexpected response from origin: {0}")]
    RemoteFormat(String),

    #[error("Cache is not ready yet")]
    NotReady,

    #[error("Missing GITHUB_TOKEN environment variable")]
    MissingToken,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CacheError::RemoteFormat(err.to_string())
        } else {
            CacheError::RemoteUnavailable(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;
