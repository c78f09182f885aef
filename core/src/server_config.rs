// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use clap::Parser;
use serde::{de::DeserializeOwned, Deserialize};
use std::{
    fs,
    io::ErrorKind,
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by every server binary
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    /// Pending jobs held before intake starts blocking
    pub queue_capacity: usize,
    pub worker_count: usize,
    /// Upper bound on each fetch and persist call
    pub store_timeout_ms: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            queue_capacity: 1000,
            worker_count: 3,
            store_timeout_ms: 10_000,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "queue_capacity must be greater than 0".to_string(),
            ));
        }
        if self.worker_count == 0 {
            return Err(ConfigError::Invalid(
                "worker_count must be greater than 0".to_string(),
            ));
        }
        if self.store_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "store_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Command-line flags win over the file
    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(listen) = args.listen {
            self.listen_addr = listen;
        }
        if let Some(workers) = args.workers {
            self.worker_count = workers;
        }
    }
}

/// Loads a JSON configuration file.
///
/// A missing file yields `T::default()`; a file that exists but cannot be
/// read or parsed is an error.
pub fn load_config<T: DeserializeOwned + Default>(path: &Path) -> Result<T, ConfigError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(path = %path.display(), "No configuration file, using defaults");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Flags accepted by every server binary
#[derive(Debug, Clone, Parser)]
pub struct CliArgs {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Address to listen on, overrides `server.listen_addr`
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Number of workers, overrides `server.worker_count`
    #[arg(long)]
    pub workers: Option<usize>,
}
