// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use async_trait::async_trait;
use field_increment_core::StoreError;
use gcp_auth::{CustomServiceAccount, TokenProvider};

/// OAuth scope covering Firestore document reads and writes
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Supplies the bearer token attached to each Firestore call
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn bearer_token(&self) -> Result<String, StoreError>;
}

/// Tokens minted from a Google service-account key.
///
/// `gcp_auth` caches the token and only goes back to the token endpoint
/// shortly before it expires.
pub struct ServiceAccountTokens {
    account: CustomServiceAccount,
}

impl ServiceAccountTokens {
    /// `key` is the JSON content of the service-account key file
    pub fn from_key(key: &str) -> Result<Self, gcp_auth::Error> {
        Ok(Self {
            account: CustomServiceAccount::from_json(key)?,
        })
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokens {
    async fn bearer_token(&self) -> Result<String, StoreError> {
        let token = self
            .account
            .token(&[DATASTORE_SCOPE])
            .await
            .map_err(|e| StoreError::Backend(format!("authentication failed: {}", e)))?;
        Ok(token.as_str().to_string())
    }
}
