// In-memory cache of the origin's organization data.
// Flattened records, repo rankings, and the atomically swapped snapshot store.

pub mod flatten;
pub mod ranking;
pub mod record;
pub mod snapshot;
pub mod store;

pub use ranking::{Metric, RankedEntry, RankingIndex, Rankings};
pub use record::{Collection, Record};
pub use snapshot::Snapshot;
pub use store::CacheStore;
