// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use field_increment_core::{Document, DocumentStore, StoreError};
use sled::Db;
use std::sync::Arc;
use tokio::task::spawn_blocking;

/// Keeps the target document as one JSON value under `document_key`
#[derive(Clone)]
pub struct SledDbStore {
    db: Arc<Db>,
    document_key: String,
}

impl SledDbStore {
    pub fn open(file_path: &str, document_key: &str) -> Result<Self, StoreError> {
        let db = sled::open(file_path).map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(Self {
            db: Arc::new(db),
            document_key: document_key.to_string(),
        })
    }
}

#[async_trait]
impl DocumentStore for SledDbStore {
    /// A key never written reads as an empty document
    async fn get(&self) -> Result<Document, StoreError> {
        let key = self.document_key.clone();
        let db = self.db.clone();
        spawn_blocking(move || {
            let value_bytes = db
                .get(key.as_bytes())
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            match value_bytes {
                Some(value_bytes) => serde_json::from_slice(&value_bytes)
                    .map_err(|e| StoreError::Encoding(e.to_string())),
                None => Ok(Document::new()),
            }
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Task panicked: {:?}", e)))?
    }

    async fn set(&self, document: Document) -> Result<(), StoreError> {
        let key = self.document_key.clone();
        let db = self.db.clone();
        spawn_blocking(move || {
            let value_bytes =
                serde_json::to_vec(&document).map_err(|e| StoreError::Encoding(e.to_string()))?;
            db.insert(key.as_bytes(), value_bytes)
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            db.flush()
                .map_err(|e| StoreError::Backend(e.to_string()))?;
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Task panicked: {:?}", e)))?
    }

    fn document_path(&self) -> &str {
        &self.document_key
    }
}
