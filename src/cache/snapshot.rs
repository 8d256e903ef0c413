// Immutable cache snapshot.
// One complete refresh cycle's worth of collections plus the repo rankings.

use chrono::{DateTime, Utc};

use super::ranking::Rankings;
use super::record::Collection;

/// Everything the cached endpoints serve. Built off the read path and never
/// mutated after it is published.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Root listing (`GET /`).
    pub root: Collection,
    /// Organization info (`GET /orgs/{org}`).
    pub org: Collection,
    /// Organization members (`GET /orgs/{org}/members`).
    pub members: Collection,
    /// Organization repos (`GET /orgs/{org}/repos`).
    pub repos: Collection,
    /// Indexes derived from `repos`.
    pub rankings: Rankings,
    /// When the snapshot finished building.
    pub built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Assemble a snapshot, deriving the rankings from `repos`.
    pub fn new(root: Collection, org: Collection, members: Collection, repos: Collection) -> Self {
        let rankings = Rankings::build(&repos);
        Self {
            root,
            org,
            members,
            repos,
            rankings,
            built_at: Utc::now(),
        }
    }
}
