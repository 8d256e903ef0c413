// Origin API module.
// HTTP client, link-header pagination, and collection fetching for the GitHub REST API.

pub mod client;
pub mod endpoints;
pub mod pagination;
pub mod types;

pub use client::GitHubClient;
pub use types::RateLimit;
