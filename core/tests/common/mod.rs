// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

#![allow(dead_code)]

use async_trait::async_trait;
use field_increment_core::{Document, DocumentStore, InMemoryStore, StoreError, StoredValue};
use std::{sync::Arc, time::Duration};
use tokio::sync::{Notify, Semaphore};

pub const DOCUMENT_PATH: &str = "test/9amFLocVwHFNEaskVVda";

pub fn document(fields: &[(&str, StoredValue)]) -> Document {
    fields
        .iter()
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect()
}

pub fn in_memory(fields: &[(&str, StoredValue)]) -> Arc<InMemoryStore> {
    Arc::new(InMemoryStore::with_document(DOCUMENT_PATH, document(fields)))
}

/// Delegates to an in-memory store, failing `get` and/or `set` on demand
pub struct FailingStore {
    pub inner: InMemoryStore,
    pub fail_get: bool,
    pub fail_set: bool,
}

impl FailingStore {
    pub fn failing_get() -> Self {
        Self {
            inner: InMemoryStore::new(DOCUMENT_PATH),
            fail_get: true,
            fail_set: false,
        }
    }

    pub fn failing_set() -> Self {
        Self {
            inner: InMemoryStore::new(DOCUMENT_PATH),
            fail_get: false,
            fail_set: true,
        }
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn get(&self) -> Result<Document, StoreError> {
        if self.fail_get {
            return Err(StoreError::Backend("unavailable".to_string()));
        }
        self.inner.get().await
    }

    async fn set(&self, document: Document) -> Result<(), StoreError> {
        if self.fail_set {
            return Err(StoreError::Backend("permission denied".to_string()));
        }
        self.inner.set(document).await
    }

    fn document_path(&self) -> &str {
        self.inner.document_path()
    }
}

/// Yields to the scheduler inside every call, giving concurrent cycles a
/// chance to interleave between fetch and persist
pub struct YieldingStore {
    pub inner: Arc<InMemoryStore>,
}

#[async_trait]
impl DocumentStore for YieldingStore {
    async fn get(&self) -> Result<Document, StoreError> {
        let document = self.inner.get().await;
        tokio::task::yield_now().await;
        document
    }

    async fn set(&self, document: Document) -> Result<(), StoreError> {
        tokio::task::yield_now().await;
        self.inner.set(document).await
    }

    fn document_path(&self) -> &str {
        self.inner.document_path()
    }
}

/// `get` never answers within any reasonable timeout
pub struct StalledStore;

#[async_trait]
impl DocumentStore for StalledStore {
    async fn get(&self) -> Result<Document, StoreError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(Document::new())
    }

    async fn set(&self, _document: Document) -> Result<(), StoreError> {
        Ok(())
    }

    fn document_path(&self) -> &str {
        DOCUMENT_PATH
    }
}

/// Holds every `get` until the test releases it
pub struct GatedStore {
    pub inner: Arc<InMemoryStore>,
    pub entered: Notify,
    pub gate: Semaphore,
}

impl GatedStore {
    pub fn new(inner: Arc<InMemoryStore>) -> Self {
        Self {
            inner,
            entered: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    /// Lets one held `get` through
    pub fn release(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn get(&self) -> Result<Document, StoreError> {
        self.entered.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        permit.forget();
        self.inner.get().await
    }

    async fn set(&self, document: Document) -> Result<(), StoreError> {
        self.inner.set(document).await
    }

    fn document_path(&self) -> &str {
        self.inner.document_path()
    }
}
