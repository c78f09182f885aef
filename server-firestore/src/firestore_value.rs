// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Mapping between Firestore REST `Value` objects and `StoredValue`.
//!
//! Only the three representations the normalizer understands are decoded.
//! Everything else, including malformed numbers, is kept as the raw object
//! and encoded back unchanged.

use field_increment_core::{Document, StoredValue};
use serde_json::{json, Map, Value};

pub fn decode_value(raw: &Value) -> StoredValue {
    // integerValue travels as a decimal string
    if let Some(integer) = raw
        .get("integerValue")
        .and_then(Value::as_str)
        .and_then(|text| text.parse::<i64>().ok())
    {
        return StoredValue::Integer(integer);
    }
    // "NaN" / "Infinity" come as strings and stay raw
    if let Some(float) = raw
        .get("doubleValue")
        .filter(|value| value.is_number())
        .and_then(Value::as_f64)
    {
        return StoredValue::Float(float);
    }
    if let Some(text) = raw.get("stringValue").and_then(Value::as_str) {
        return StoredValue::String(text.to_string());
    }
    StoredValue::Other(raw.clone())
}

pub fn encode_value(value: &StoredValue) -> Value {
    match value {
        StoredValue::Integer(integer) => json!({ "integerValue": integer.to_string() }),
        StoredValue::Float(float) => json!({ "doubleValue": float }),
        StoredValue::String(text) => json!({ "stringValue": text }),
        StoredValue::Other(raw) => raw.clone(),
    }
}

pub fn decode_fields(fields: &Map<String, Value>) -> Document {
    fields
        .iter()
        .map(|(name, raw)| (name.clone(), decode_value(raw)))
        .collect()
}

pub fn encode_fields(document: &Document) -> Map<String, Value> {
    document
        .iter()
        .map(|(name, value)| (name.clone(), encode_value(value)))
        .collect()
}
