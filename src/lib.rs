// org-cache: read-through cache and reverse proxy for a GitHub organization.

pub mod app;
pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod refresh;
pub mod server;

#[cfg(test)]
mod testing;

pub use app::App;
pub use config::Config;
pub use error::{CacheError, Result};
