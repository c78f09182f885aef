// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use serde::Deserialize;

/// Request body could not be turned into an `UpdateRequest`
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("field name is empty")]
    EmptyField,
}

/// Wire form of the request body: `{"field": "...", "value": 1.5}`
#[derive(Debug, Deserialize)]
struct RequestBody {
    field: String,
    value: f64,
}

/// "Add `delta` to `field`" on the target document
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateRequest {
    field: String,
    delta: f64,
}

impl UpdateRequest {
    pub fn new(field: &str, delta: f64) -> Result<Self, PayloadError> {
        if field.is_empty() {
            return Err(PayloadError::EmptyField);
        }
        Ok(Self {
            field: field.to_string(),
            delta,
        })
    }

    /// Parses a JSON request body. Unknown keys are ignored.
    pub fn from_json(body: &[u8]) -> Result<Self, PayloadError> {
        let body: RequestBody = serde_json::from_slice(body)?;
        Self::new(&body.field, body.value)
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    pub(crate) fn into_field(self) -> String {
        self.field
    }
}
