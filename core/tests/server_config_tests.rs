// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use clap::Parser;
use field_increment_core::{load_config, CliArgs, ConfigError, ServerConfig};
use std::{io::Write, net::SocketAddr, time::Duration};
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let config = ServerConfig::default();

    assert_eq!(config.listen_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    assert_eq!(config.queue_capacity, 1000);
    assert_eq!(config.worker_count, 3);
    assert_eq!(config.store_timeout(), Duration::from_secs(10));
    assert!(config.validate().is_ok());
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();

    let config: ServerConfig = load_config(&dir.path().join("absent.json")).unwrap();

    assert_eq!(config, ServerConfig::default());
}

#[test]
fn test_partial_file_keeps_other_defaults() {
    let file = config_file(r#"{"listen_addr": "127.0.0.1:9090", "worker_count": 8}"#);

    let config: ServerConfig = load_config(file.path()).unwrap();

    assert_eq!(config.listen_addr, "127.0.0.1:9090".parse::<SocketAddr>().unwrap());
    assert_eq!(config.worker_count, 8);
    assert_eq!(config.queue_capacity, 1000);
}

#[test]
fn test_unparsable_file_is_an_error() {
    let file = config_file("{ not json");

    let result: Result<ServerConfig, ConfigError> = load_config(file.path());

    assert!(matches!(result, Err(ConfigError::Parse { .. })));
}

#[test]
fn test_zero_sized_pool_or_queue_is_invalid() {
    let config = ServerConfig {
        worker_count: 0,
        ..ServerConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let config = ServerConfig {
        queue_capacity: 0,
        ..ServerConfig::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}

#[test]
fn test_cli_flags_override_the_file() {
    let args = CliArgs::parse_from([
        "field-increment",
        "--config",
        "custom.json",
        "--listen",
        "127.0.0.1:7000",
        "--workers",
        "5",
    ]);
    let mut config = ServerConfig::default();

    config.apply_overrides(&args);

    assert_eq!(args.config.to_str(), Some("custom.json"));
    assert_eq!(config.listen_addr, "127.0.0.1:7000".parse::<SocketAddr>().unwrap());
    assert_eq!(config.worker_count, 5);
    assert_eq!(config.queue_capacity, 1000);
}
