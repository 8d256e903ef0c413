// Record flattening.
// Nested objects are inlined under dotted keys; arrays and scalars are kept as-is.

use serde_json::{Map, Value};

use crate::error::{CacheError, Result};

use super::record::{Collection, Record};

/// Flatten an origin payload: an object becomes one record, an array of
/// objects becomes one record per element in the same order.
pub fn flatten(value: Value) -> Result<Collection> {
    match value {
        Value::Object(map) => Ok(Collection::One(flatten_record(map, ""))),
        Value::Array(items) => flatten_all(items).map(Collection::Many),
        other => Err(CacheError::RemoteFormat(format!(
            "expected a JSON object or array, got {}",
            kind(&other)
        ))),
    }
}

/// Flatten every element of a list, which must all be objects.
pub fn flatten_all(items: Vec<Value>) -> Result<Vec<Record>> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(map) => Ok(flatten_record(map, "")),
            other => Err(CacheError::RemoteFormat(format!(
                "expected an object at index {}, got {}",
                i,
                kind(&other)
            ))),
        })
        .collect()
}

/// Flatten one object, prefixing every key with `prefix`.
pub fn flatten_record(map: Map<String, Value>, prefix: &str) -> Record {
    let mut flat = Record::new();
    flatten_into(&mut flat, map, prefix);
    flat
}

fn flatten_into(flat: &mut Record, map: Map<String, Value>, prefix: &str) {
    for (key, value) in map {
        let key = format!("{}{}", prefix, key);
        match value {
            Value::Object(nested) => flatten_into(flat, nested, &format!("{}.", key)),
            value => {
                flat.insert(key, value);
            }
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
