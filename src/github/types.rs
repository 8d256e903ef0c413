// Origin API response metadata.
// Rate limit accounting parsed from GitHub response headers.

use reqwest::header::HeaderMap;

/// Rate limit information from response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimit {
    pub limit: u64,
    pub remaining: u64,
    pub reset: u64,
}

impl RateLimit {
    /// Parse the `x-ratelimit-*` headers. Returns `None` when the origin sent none.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let read = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
        };

        let remaining = read("x-ratelimit-remaining")?;
        Some(Self {
            limit: read("x-ratelimit-limit").unwrap_or_default(),
            remaining,
            reset: read("x-ratelimit-reset").unwrap_or_default(),
        })
    }

    /// Reset time formatted for log and error messages.
    pub fn reset_at(&self) -> String {
        chrono::DateTime::from_timestamp(self.reset as i64, 0)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
