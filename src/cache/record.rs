// Flattened records and collections.
// The unit of cached data: one origin payload after flattening.

use serde::Serialize;
use serde_json::{Map, Value};

/// One flattened entity: dotted key paths to non-object JSON values.
pub type Record = Map<String, Value>;

/// A fully drained origin resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Collection {
    /// A resource that is a single object (root listing, org info).
    One(Record),
    /// A resource that is a list, in page arrival order.
    Many(Vec<Record>),
}

impl Collection {
    /// All records, a single-object resource yielding one.
    pub fn records(&self) -> &[Record] {
        match self {
            Collection::One(record) => std::slice::from_ref(record),
            Collection::Many(records) => records,
        }
    }

    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

impl Default for Collection {
    fn default() -> Self {
        Collection::Many(Vec::new())
    }
}
