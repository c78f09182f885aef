// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Document, DocumentStore, StoreError};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

/// Process-local document, used for development and tests
pub struct InMemoryStore {
    document_path: String,
    document: RwLock<Document>,
    writes: AtomicU64,
}

impl InMemoryStore {
    pub fn new(document_path: &str) -> Self {
        Self::with_document(document_path, Document::new())
    }

    pub fn with_document(document_path: &str, document: Document) -> Self {
        Self {
            document_path: document_path.to_string(),
            document: RwLock::new(document),
            writes: AtomicU64::new(0),
        }
    }

    /// Copy of the current document
    pub async fn snapshot(&self) -> Document {
        self.document.read().await.clone()
    }

    /// Number of `set` calls served so far
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get(&self) -> Result<Document, StoreError> {
        Ok(self.document.read().await.clone())
    }

    async fn set(&self, document: Document) -> Result<(), StoreError> {
        *self.document.write().await = document;
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn document_path(&self) -> &str {
        &self.document_path
    }
}
