// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    increment, normalize, DocumentStore, NotNumericError, StoreError, StoredValue, UpdateRequest,
};
use std::{future::Future, sync::Arc, time::Duration};
use tokio::sync::Mutex;
use tracing::debug;

/// Result of a successful update
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOutcome {
    pub field: String,
    /// Value as persisted, after truncation
    pub new_value: f64,
}

/// Why an update did not happen. `Display` is the message returned to the caller.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UpdateError {
    /// The current field value cannot be incremented
    #[error(transparent)]
    BadRequest(#[from] NotNumericError),

    /// The increment overflowed
    #[error("Resulting value is not finite")]
    NonFiniteResult,

    #[error("Error getting document: {0}")]
    Fetch(StoreError),

    #[error("Error updating document: {0}")]
    Persist(StoreError),
}

impl UpdateError {
    /// True when the caller, not the store, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, UpdateError::BadRequest(_) | UpdateError::NonFiniteResult)
    }
}

/// Runs the read-modify-write cycle against the target document.
///
/// One coordinator serves the whole process. Its critical section covers
/// fetch, normalize, increment and persist, so at most one cycle is in flight
/// at any instant. This is only sound because the deployment targets a single
/// document from a single process.
pub struct UpdateCoordinator {
    store: Arc<dyn DocumentStore>,
    critical_section: Mutex<()>,
    store_timeout: Duration,
}

impl UpdateCoordinator {
    pub fn new(store: Arc<dyn DocumentStore>, store_timeout: Duration) -> Self {
        Self {
            store,
            critical_section: Mutex::new(()),
            store_timeout,
        }
    }

    /// Applies `request` to the target document.
    ///
    /// The whole document is read and written back; fields other than
    /// `request.field()` are carried over untouched. Nothing is written when
    /// normalization or the increment fails.
    pub async fn apply(&self, request: UpdateRequest) -> Result<UpdateOutcome, UpdateError> {
        let _guard = self.critical_section.lock().await;

        let mut document = self
            .bounded(self.store.get())
            .await
            .map_err(UpdateError::Fetch)?;

        let current = normalize(document.get(request.field()))?;
        let new_value = increment(current, request.delta());
        if !new_value.is_finite() {
            return Err(UpdateError::NonFiniteResult);
        }

        debug!(
            field = request.field(),
            current,
            delta = request.delta(),
            new_value,
            "Computed new value"
        );

        let field = request.into_field();
        document.insert(field.clone(), StoredValue::Float(new_value));

        self.bounded(self.store.set(document))
            .await
            .map_err(UpdateError::Persist)?;

        Ok(UpdateOutcome { field, new_value })
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.store_timeout)),
        }
    }
}
