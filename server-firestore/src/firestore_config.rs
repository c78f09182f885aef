// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::firestore_auth::{ServiceAccountTokens, TokenSource};
use field_increment_core::{ConfigError, ServerConfig};
use serde::Deserialize;
use std::{fs, path::PathBuf, sync::Arc};

pub const FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com";
pub const EMULATOR_PROJECT_ID: &str = "demo-field-increment";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FirestoreConfig {
    pub server: ServerConfig,
    /// Falls back to the `project_id` of the service-account key
    pub project_id: Option<String>,
    pub collection: String,
    pub document_id: String,
    /// Google service-account key, as downloaded from the console
    pub credentials_path: PathBuf,
    /// `host:port` of a Firestore emulator; no credentials are used
    pub emulator_host: Option<String>,
}

impl Default for FirestoreConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            project_id: None,
            collection: "test".to_string(),
            document_id: "9amFLocVwHFNEaskVVda".to_string(),
            credentials_path: PathBuf::from("./key.json"),
            emulator_host: None,
        }
    }
}

/// The part of the service-account key read here; `gcp_auth` reads the rest
#[derive(Debug, Deserialize)]
struct ServiceAccountKey {
    project_id: Option<String>,
}

/// Where and how to reach the target document
#[derive(Clone)]
pub struct FirestoreTarget {
    pub document_url: String,
    pub document_path: String,
    /// None against the emulator
    pub tokens: Option<Arc<dyn TokenSource>>,
}

impl FirestoreConfig {
    pub fn document_path(&self) -> String {
        format!("{}/{}", self.collection, self.document_id)
    }

    pub fn resolve(&self) -> Result<FirestoreTarget, ConfigError> {
        let (base_url, project_id, tokens) = match &self.emulator_host {
            Some(host) => (
                format!("http://{}", host),
                self.project_id
                    .clone()
                    .unwrap_or_else(|| EMULATOR_PROJECT_ID.to_string()),
                None,
            ),
            None => {
                let (key_project_id, tokens) = self.load_service_account()?;
                let project_id = self.project_id.clone().or(key_project_id).ok_or_else(|| {
                    ConfigError::Invalid(
                        "project_id missing from both config and service account key".to_string(),
                    )
                })?;
                let tokens: Arc<dyn TokenSource> = Arc::new(tokens);
                (FIRESTORE_BASE_URL.to_string(), project_id, Some(tokens))
            }
        };

        Ok(FirestoreTarget {
            document_url: format!(
                "{}/v1/projects/{}/databases/(default)/documents/{}",
                base_url,
                project_id,
                self.document_path()
            ),
            document_path: self.document_path(),
            tokens,
        })
    }

    fn load_service_account(
        &self,
    ) -> Result<(Option<String>, ServiceAccountTokens), ConfigError> {
        let path = &self.credentials_path;
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        let key: ServiceAccountKey =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.clone(),
                source,
            })?;
        let tokens = ServiceAccountTokens::from_key(&contents).map_err(|e| {
            ConfigError::Invalid(format!(
                "unusable service account key {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok((key.project_id, tokens))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::io::Write;

    const SERVICE_ACCOUNT_KEY: &str =
        concat!(env!("CARGO_MANIFEST_DIR"), "/testdata/service-account.json");

    fn key_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    /// The service-account key with `edit` applied to its JSON
    fn edited_key(
        edit: impl FnOnce(&mut serde_json::Map<String, Value>),
    ) -> tempfile::NamedTempFile {
        let mut key: Value =
            serde_json::from_str(&fs::read_to_string(SERVICE_ACCOUNT_KEY).unwrap()).unwrap();
        edit(key.as_object_mut().unwrap());
        key_file(&key.to_string())
    }

    #[test]
    fn test_emulator_target_needs_no_credentials() {
        let config = FirestoreConfig {
            emulator_host: Some("localhost:8081".to_string()),
            credentials_path: PathBuf::from("/does/not/exist.json"),
            ..FirestoreConfig::default()
        };

        let target = config.resolve().unwrap();

        assert_eq!(
            target.document_url,
            "http://localhost:8081/v1/projects/demo-field-increment/databases/(default)/documents/test/9amFLocVwHFNEaskVVda"
        );
        assert!(target.tokens.is_none());
    }

    #[test]
    fn test_service_account_key_is_accepted() {
        let config = FirestoreConfig {
            credentials_path: PathBuf::from(SERVICE_ACCOUNT_KEY),
            ..FirestoreConfig::default()
        };

        let target = config.resolve().unwrap();

        assert_eq!(
            target.document_url,
            "https://firestore.googleapis.com/v1/projects/field-increment-test/databases/(default)/documents/test/9amFLocVwHFNEaskVVda"
        );
        assert_eq!(target.document_path, "test/9amFLocVwHFNEaskVVda");
        assert!(target.tokens.is_some());
    }

    #[test]
    fn test_configured_project_wins() {
        let config = FirestoreConfig {
            project_id: Some("other".to_string()),
            credentials_path: PathBuf::from(SERVICE_ACCOUNT_KEY),
            ..FirestoreConfig::default()
        };

        let target = config.resolve().unwrap();

        assert!(target.document_url.contains("/projects/other/"));
    }

    #[test]
    fn test_key_without_private_key_is_invalid() {
        let file = edited_key(|key| {
            key.remove("private_key");
        });
        let config = FirestoreConfig {
            credentials_path: file.path().to_path_buf(),
            ..FirestoreConfig::default()
        };

        assert!(matches!(config.resolve(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_project_is_invalid() {
        let file = edited_key(|key| {
            key.remove("project_id");
        });
        let config = FirestoreConfig {
            credentials_path: file.path().to_path_buf(),
            ..FirestoreConfig::default()
        };

        assert!(matches!(config.resolve(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_key_that_is_not_json_is_a_parse_error() {
        let file = key_file("not json");
        let config = FirestoreConfig {
            credentials_path: file.path().to_path_buf(),
            ..FirestoreConfig::default()
        };

        assert!(matches!(config.resolve(), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_credentials_file_is_an_error() {
        let config = FirestoreConfig {
            credentials_path: PathBuf::from("/does/not/exist.json"),
            ..FirestoreConfig::default()
        };

        assert!(matches!(config.resolve(), Err(ConfigError::Io { .. })));
    }
}
