// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    firestore_config::FirestoreTarget,
    firestore_value::{decode_fields, encode_fields},
};
use async_trait::async_trait;
use field_increment_core::{Document, DocumentStore, StoreError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Deserialize)]
struct FirestoreDocument {
    /// Omitted by Firestore when the document has no fields
    #[serde(default)]
    fields: Map<String, Value>,
}

/// Target document behind the Firestore REST API
pub struct FirestoreStore {
    client: Client,
    target: FirestoreTarget,
}

impl FirestoreStore {
    pub fn new(client: Client, target: FirestoreTarget) -> Self {
        Self { client, target }
    }

    async fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, StoreError> {
        match &self.target.tokens {
            Some(tokens) => Ok(builder.bearer_auth(tokens.bearer_token().await?)),
            None => Ok(builder),
        }
    }

    async fn check(&self, response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(self.target.document_path.clone()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Backend(format!("{}: {}", status, body.trim())));
        }
        Ok(response)
    }
}

fn transport_error(error: reqwest::Error) -> StoreError {
    StoreError::Transport(error.to_string())
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn get(&self) -> Result<Document, StoreError> {
        let response = self
            .authorized(self.client.get(&self.target.document_url))
            .await?
            .send()
            .await
            .map_err(transport_error)?;
        let document: FirestoreDocument = self
            .check(response)
            .await?
            .json()
            .await
            .map_err(|e| StoreError::Encoding(e.to_string()))?;
        Ok(decode_fields(&document.fields))
    }

    /// PATCH without an update mask replaces every field of the document
    async fn set(&self, document: Document) -> Result<(), StoreError> {
        let body = json!({ "fields": encode_fields(&document) });
        let response = self
            .authorized(self.client.patch(&self.target.document_url))
            .await?
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;
        self.check(response).await?;
        Ok(())
    }

    fn document_path(&self) -> &str {
        &self.target.document_path
    }
}
