// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Document;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for abstracting the store that holds the single target document
/// Different implementations for Firestore, sled, memory, etc.
///
/// Implementations carry no concurrency control of their own: callers that
/// need read-modify-write atomicity serialize around `get` + `set`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the full snapshot of the target document
    async fn get(&self) -> Result<Document, StoreError>;

    /// Overwrite the target document with `document`
    ///
    /// Whole-document replacement: fields missing from `document` are gone
    /// after the call.
    async fn set(&self, document: Document) -> Result<(), StoreError>;

    /// Path of the target document, for logs
    fn document_path(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The target document does not exist
    #[error("document '{0}' not found")]
    NotFound(String),

    /// The store did not answer within the configured bound
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Network-level failure talking to the store
    #[error("transport error: {0}")]
    Transport(String),

    /// The store answered with a failure
    #[error("store error: {0}")]
    Backend(String),

    /// The document could not be encoded or decoded
    #[error("encoding error: {0}")]
    Encoding(String),
}
