#![forbid(unsafe_code)]

//! Flatten a record's fields into a name -> value mapping.
//!
//! The record's shape comes from its `serde::Serialize` impl, usually
//! derived, so each type declares its field list statically. The result is
//! one level deep: nested structs, sequences and maps stay whole as a single
//! [`serde_json::Value`].
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Not a record | Input serializes to a scalar, sequence, or null | `PropertyError::NotARecord` |
//! | Serialize error | e.g. a map with non-string keys | `PropertyError::Serialize` |

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Field name -> field value, in field declaration order.
pub type PropertyMap = IndexMap<String, Value>;

/// Errors from [`property_values`].
#[derive(Debug, Error)]
pub enum PropertyError {
    /// The input does not serialize to a set of named fields.
    #[error("expected a record with named fields, found {kind}")]
    NotARecord { kind: &'static str },
    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Named fields of `record` and their values, in declaration order.
pub fn property_values<T>(record: &T) -> Result<PropertyMap, PropertyError>
where
    T: Serialize + ?Sized,
{
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields.into_iter().collect()),
        other => Err(PropertyError::NotARecord {
            kind: value_kind(&other),
        }),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
