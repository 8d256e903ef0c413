// Ranking indexes over the org repos collection.
// Each index orders repos by one metric so bottom-N views are a prefix read.

use std::cmp::Ordering;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;

use super::record::{Collection, Record};

/// Format of the origin's `updated_at` timestamps (always UTC).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const IDENTITY_FIELD: &str = "full_name";

/// Metrics that ranked views can be requested for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Forks,
    LastUpdated,
    OpenIssues,
    Stars,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::Forks,
        Metric::LastUpdated,
        Metric::OpenIssues,
        Metric::Stars,
    ];

    /// Path segment used by the `/view/bottom/{n}/{metric}` endpoints.
    pub fn slug(&self) -> &'static str {
        match self {
            Metric::Forks => "forks",
            Metric::LastUpdated => "last_updated",
            Metric::OpenIssues => "open_issues",
            Metric::Stars => "stars",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.slug() == slug)
    }

    /// Record field the metric is read from.
    pub fn field(&self) -> &'static str {
        match self {
            Metric::Forks => "forks",
            Metric::LastUpdated => "updated_at",
            Metric::OpenIssues => "open_issues",
            Metric::Stars => "stargazers_count",
        }
    }

    /// Build the index key for a record, or `None` if the record has no usable value.
    fn key_for(&self, record: &Record) -> Option<RankKey> {
        let identity = record.get(IDENTITY_FIELD)?.as_str()?;
        let value = record.get(self.field())?;

        let (priority, display) = match self {
            Metric::LastUpdated => {
                let raw = value.as_str()?;
                let parsed = NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).ok()?;
                (-parsed.and_utc().timestamp(), Value::from(raw))
            }
            _ => {
                let count = value.as_i64()?;
                (count.checked_neg()?, Value::from(count))
            }
        };

        Some(RankKey {
            priority,
            identity: identity.to_string(),
            display,
        })
    }
}

/// One index entry. The priority is the negated metric, so the smallest
/// priority belongs to the repo with the largest metric.
#[derive(Debug, Clone, PartialEq)]
pub struct RankKey {
    pub priority: i64,
    pub identity: String,
    /// Value shown to clients: the count, or the original timestamp string.
    pub display: Value,
}

/// A `[identity, value]` pair as returned by the ranked views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry(pub String, pub Value);

/// Entries for one metric, held in ascending metric order
/// (descending priority), ties broken by identity.
#[derive(Debug, Clone, Default)]
pub struct RankingIndex {
    entries: Vec<RankKey>,
}

impl RankingIndex {
    pub fn build(metric: Metric, records: &[Record]) -> Self {
        let mut entries: Vec<RankKey> = records.iter().filter_map(|r| metric.key_for(r)).collect();
        entries.sort_by(ascending_metric);
        Self { entries }
    }

    /// The `n` entries with the smallest metric, smallest first.
    /// Asking for more than the index holds returns everything.
    pub fn bottom(&self, n: usize) -> Vec<RankedEntry> {
        self.entries
            .iter()
            .take(n)
            .map(|key| RankedEntry(key.identity.clone(), key.display.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn ascending_metric(a: &RankKey, b: &RankKey) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| a.identity.cmp(&b.identity))
}

/// The four indexes derived from one repos collection.
#[derive(Debug, Clone, Default)]
pub struct Rankings {
    pub forks: RankingIndex,
    pub last_updated: RankingIndex,
    pub open_issues: RankingIndex,
    pub stars: RankingIndex,
}

impl Rankings {
    pub fn build(repos: &Collection) -> Self {
        let records = repos.records();
        Self {
            forks: RankingIndex::build(Metric::Forks, records),
            last_updated: RankingIndex::build(Metric::LastUpdated, records),
            open_issues: RankingIndex::build(Metric::OpenIssues, records),
            stars: RankingIndex::build(Metric::Stars, records),
        }
    }

    pub fn index(&self, metric: Metric) -> &RankingIndex {
        match metric {
            Metric::Forks => &self.forks,
            Metric::LastUpdated => &self.last_updated,
            Metric::OpenIssues => &self.open_issues,
            Metric::Stars => &self.stars,
        }
    }
}
