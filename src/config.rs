// Runtime configuration.
// Read from environment variables at startup; the origin token never lives in source.

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CacheError, Result};

pub const DEFAULT_ORIGIN: &str = "https://api.github.com";
pub const DEFAULT_ORG: &str = "Netflix";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const DEFAULT_HEALTH_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for the cache, the refresh loop, and the HTTP listener.
#[derive(Clone)]
pub struct Config {
    /// Bearer token sent to the origin on every request.
    pub token: String,
    /// Base URL of the origin API, without a trailing slash.
    pub origin: String,
    /// Organization whose endpoints are cached.
    pub org: String,
    pub bind: SocketAddr,
    /// Delay between the end of one refresh and the start of the next.
    pub refresh_interval: Duration,
    pub page_size: u32,
    /// How long `/healthcheck` waits for the first snapshot.
    pub health_timeout: Duration,
}

impl Config {
    /// Build a config with defaults for everything except the token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            origin: DEFAULT_ORIGIN.to_string(),
            org: DEFAULT_ORG.to_string(),
            bind: SocketAddr::from(([127, 0, 0, 1], 8000)),
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            page_size: DEFAULT_PAGE_SIZE,
            health_timeout: DEFAULT_HEALTH_TIMEOUT,
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let token = lookup("GITHUB_TOKEN")
            .filter(|t| !t.trim().is_empty())
            .ok_or(CacheError::MissingToken)?;

        let mut config = Self::new(token);

        if let Some(origin) = lookup("ORG_CACHE_ORIGIN") {
            config.origin = origin.trim_end_matches('/').to_string();
        }
        if let Some(org) = lookup("ORG_CACHE_ORG") {
            if !is_valid_login(&org) {
                return Err(CacheError::Config(format!("invalid org name {:?}", org)));
            }
            config.org = org;
        }
        config.bind = parse_var(&lookup, "ORG_CACHE_BIND", DEFAULT_BIND)?;
        config.refresh_interval = Duration::from_secs(parse_var(
            &lookup,
            "ORG_CACHE_REFRESH_SECS",
            &DEFAULT_REFRESH_INTERVAL.as_secs().to_string(),
        )?);
        config.page_size = parse_var(
            &lookup,
            "ORG_CACHE_PAGE_SIZE",
            &DEFAULT_PAGE_SIZE.to_string(),
        )?;
        if config.page_size == 0 {
            return Err(CacheError::Config("ORG_CACHE_PAGE_SIZE must be positive".into()));
        }
        config.health_timeout = Duration::from_secs(parse_var(
            &lookup,
            "ORG_CACHE_HEALTH_TIMEOUT_SECS",
            &DEFAULT_HEALTH_TIMEOUT.as_secs().to_string(),
        )?);

        Ok(config)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("token", &"<redacted>")
            .field("origin", &self.origin)
            .field("org", &self.org)
            .field("bind", &self.bind)
            .field("refresh_interval", &self.refresh_interval)
            .field("page_size", &self.page_size)
            .field("health_timeout", &self.health_timeout)
            .finish()
    }
}

/// GitHub logins are ASCII letters, digits, and hyphens. The org name is
/// spliced into route patterns, so nothing else is allowed through.
fn is_valid_login(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = lookup(key).unwrap_or_else(|| default.to_string());
    raw.trim()
        .parse()
        .map_err(|e| CacheError::Config(format!("{}={:?}: {}", key, raw, e)))
}
