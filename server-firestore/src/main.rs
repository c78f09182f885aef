// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod firestore_auth;
mod firestore_config;
mod firestore_store;
mod firestore_value;

use crate::{firestore_config::FirestoreConfig, firestore_store::FirestoreStore};
use clap::Parser;
use field_increment_core::{ctrl_c_token, load_config, telemetry, CliArgs, ServerRunner};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let args = CliArgs::parse();
    let mut config: FirestoreConfig = load_config(&args.config)?;
    config.server.apply_overrides(&args);

    let target = config.resolve()?;
    info!(
        document = %target.document_path,
        emulator = config.emulator_host.is_some(),
        "Resolved Firestore document"
    );

    let client = reqwest::Client::builder()
        .timeout(config.server.store_timeout())
        .build()?;
    let store = Arc::new(FirestoreStore::new(client, target));
    info!("Press Ctrl+C to stop the server");

    ServerRunner::new(config.server, store)
        .run(ctrl_c_token())
        .await?;

    info!("Server stopped");
    Ok(())
}
