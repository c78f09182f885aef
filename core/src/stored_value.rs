// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Snapshot of the target document: field name -> stored value
pub type Document = BTreeMap<String, StoredValue>;

/// Representation of a single stored field as the backend handed it to us.
///
/// `Other` keeps the backend's raw encoding (booleans, nulls, maps, lists,
/// timestamps, ...) so a field we never touch is written back exactly as read.
///
/// The serde form is plain JSON: integers, floats and strings map onto their
/// JSON counterparts and everything else is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum StoredValue {
    Integer(i64),
    Float(f64),
    String(String),
    Other(Value),
}

impl From<Value> for StoredValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    StoredValue::Integer(integer)
                } else if let Some(float) = number.as_f64() {
                    StoredValue::Float(float)
                } else {
                    StoredValue::Other(Value::Number(number))
                }
            }
            Value::String(text) => StoredValue::String(text),
            other => StoredValue::Other(other),
        }
    }
}

impl From<StoredValue> for Value {
    fn from(value: StoredValue) -> Self {
        match value {
            StoredValue::Integer(integer) => Value::from(integer),
            // Non-finite floats become null, same as serde_json does for f64
            StoredValue::Float(float) => Value::from(float),
            StoredValue::String(text) => Value::String(text),
            StoredValue::Other(raw) => raw,
        }
    }
}
