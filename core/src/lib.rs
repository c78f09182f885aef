// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

mod stored_value;
pub use stored_value::{Document, StoredValue};

mod value_normalizer;
pub use value_normalizer::{normalize, NotNumericError};

mod increment_engine;
pub use increment_engine::{increment, DECIMAL_SCALE};

mod document_store;
pub use document_store::{DocumentStore, StoreError};

mod in_memory_store;
pub use in_memory_store::InMemoryStore;

mod update_request;
pub use update_request::{PayloadError, UpdateRequest};

mod update_coordinator;
pub use update_coordinator::{UpdateCoordinator, UpdateError, UpdateOutcome};

mod job_queue;
pub use job_queue::{job_queue, Job, JobQueue, JobReceiver, JobResult, QueueError};

mod worker_pool;
pub use worker_pool::WorkerPool;

pub mod http_routes;

mod server_config;
pub use server_config::{load_config, CliArgs, ConfigError, ServerConfig};

mod server_runner;
pub use server_runner::{ctrl_c_token, ServerError, ServerRunner};

pub mod telemetry;
