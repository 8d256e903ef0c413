// Origin API endpoint functions.
// Drains paginated resources and flattens them into cache collections.

use serde_json::Value;
use tracing::debug;

use crate::cache::flatten::{flatten, flatten_all};
use crate::cache::record::Collection;
use crate::error::{CacheError, Result};

use super::client::GitHubClient;
use super::pagination::{first_page_url, next_link};

impl GitHubClient {
    /// Fetch every page of `path` and flatten the result.
    ///
    /// An object response is returned as a single record. An array response
    /// has each `rel="next"` page appended in arrival order. Any failed page
    /// aborts the whole fetch.
    pub async fn fetch_all(&self, path: &str, per_page: u32) -> Result<Collection> {
        let url = first_page_url(self.origin(), path, per_page);
        let response = self.get_url(&url).await?;
        let mut next = next_link(response.headers());

        let mut items = match response.json::<Value>().await? {
            Value::Array(items) => items,
            Value::Object(_) if next.is_some() => {
                return Err(CacheError::RemoteFormat(format!(
                    "{} is paginated but did not return a list",
                    url
                )));
            }
            other => return flatten(other),
        };

        let mut pages = 1;
        while let Some(url) = next {
            let response = self.get_url(&url).await?;
            next = next_link(response.headers());
            match response.json::<Value>().await? {
                Value::Array(page) => items.extend(page),
                _ => {
                    return Err(CacheError::RemoteFormat(format!(
                        "page {} of {} is not a list",
                        pages + 1,
                        path
                    )));
                }
            }
            pages += 1;
        }

        debug!(path, pages, records = items.len(), "fetched collection");
        flatten_all(items).map(Collection::Many)
    }

    /// Fetch the root listing (`GET /`).
    pub async fn get_root(&self, per_page: u32) -> Result<Collection> {
        self.fetch_all("", per_page).await
    }

    /// Fetch an organization's info.
    pub async fn get_org(&self, org: &str, per_page: u32) -> Result<Collection> {
        self.fetch_all(&format!("orgs/{}", org), per_page).await
    }

    /// Fetch all members of an organization.
    pub async fn get_org_members(&self, org: &str, per_page: u32) -> Result<Collection> {
        self.fetch_all(&format!("orgs/{}/members", org), per_page)
            .await
    }

    /// Fetch all repositories of an organization.
    pub async fn get_org_repos(&self, org: &str, per_page: u32) -> Result<Collection> {
        self.fetch_all(&format!("orgs/{}/repos", org), per_page)
            .await
    }
}
