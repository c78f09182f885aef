// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod sled_db_store;

use crate::sled_db_store::SledDbStore;
use clap::Parser;
use field_increment_core::{
    ctrl_c_token, load_config, telemetry, CliArgs, ServerConfig, ServerRunner,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct SledConfig {
    server: ServerConfig,
    db_path: String,
    document_key: String,
}

impl Default for SledConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            db_path: "field-increment.sled".to_string(),
            document_key: "test/9amFLocVwHFNEaskVVda".to_string(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let args = CliArgs::parse();
    let mut config: SledConfig = load_config(&args.config)?;
    config.server.apply_overrides(&args);

    let store = Arc::new(SledDbStore::open(&config.db_path, &config.document_key)?);
    info!(db_path = %config.db_path, "Opened sled database");
    info!("Press Ctrl+C to stop the server");

    ServerRunner::new(config.server, store)
        .run(ctrl_c_token())
        .await?;

    info!("Server stopped");
    Ok(())
}
