// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use clap::Parser;
use field_increment_core::{
    ctrl_c_token, load_config, telemetry, CliArgs, Document, InMemoryStore, ServerConfig,
    ServerRunner,
};
use serde::Deserialize;
use std::{fs, path::PathBuf, sync::Arc};
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(default)]
struct InMemoryConfig {
    server: ServerConfig,
    document_path: String,
    /// JSON object the document starts from
    seed_path: Option<PathBuf>,
}

impl Default for InMemoryConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            document_path: "test/9amFLocVwHFNEaskVVda".to_string(),
            seed_path: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    let args = CliArgs::parse();
    let mut config: InMemoryConfig = load_config(&args.config)?;
    config.server.apply_overrides(&args);

    let document: Document = match &config.seed_path {
        Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
        None => Document::new(),
    };
    info!(
        fields = document.len(),
        document = %config.document_path,
        "Seeded in-memory document"
    );

    let store = Arc::new(InMemoryStore::with_document(&config.document_path, document));
    info!("Press Ctrl+C to stop the server");

    ServerRunner::new(config.server, store)
        .run(ctrl_c_token())
        .await?;

    info!("Server stopped");
    Ok(())
}
