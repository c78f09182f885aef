// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    http_routes::routes, job_queue, ConfigError, DocumentStore, ServerConfig, UpdateCoordinator,
    WorkerPool,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] warp::Error),
}

/// Wires store, coordinator, job queue, worker pool and HTTP intake together
pub struct ServerRunner {
    config: ServerConfig,
    store: Arc<dyn DocumentStore>,
}

impl ServerRunner {
    pub fn new(config: ServerConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Serves until `shutdown` is cancelled, then stops the worker pool
    pub async fn run(self, shutdown: CancellationToken) -> Result<(), ServerError> {
        let (_, serving) = self.bind(shutdown)?;
        serving.await;
        Ok(())
    }

    /// Starts the workers and binds the listener.
    ///
    /// Returns the bound address and the future driving the server. Once
    /// `shutdown` is cancelled the listener stops accepting, in-flight
    /// requests are answered, and only then are the workers stopped.
    /// Nothing is spawned or bound when the configuration is invalid.
    pub fn bind(
        self,
        shutdown: CancellationToken,
    ) -> Result<(SocketAddr, impl Future<Output = ()>), ServerError> {
        self.config.validate()?;

        let coordinator = Arc::new(UpdateCoordinator::new(
            self.store.clone(),
            self.config.store_timeout(),
        ));
        let (queue, receiver) = job_queue(self.config.queue_capacity);

        // Own token: workers keep serving while in-flight requests drain
        let pool = WorkerPool::spawn(
            self.config.worker_count,
            receiver,
            coordinator,
            CancellationToken::new(),
        );

        let bound = warp::serve(routes(queue)).try_bind_with_graceful_shutdown(
            self.config.listen_addr,
            async move { shutdown.cancelled().await },
        );
        let (addr, server) = match bound {
            Ok(bound) => bound,
            Err(e) => {
                // Nothing will join these workers; just release them
                pool.cancellation_token().cancel();
                return Err(e.into());
            }
        };

        info!(
            %addr,
            document = self.store.document_path(),
            queue_capacity = self.config.queue_capacity,
            workers = pool.size(),
            "Server listening"
        );

        let serving = async move {
            server.await;
            info!("Server stopped accepting requests");
            pool.shutdown().await;
        };
        Ok((addr, serving))
    }
}

/// Token cancelled on Ctrl+C
pub fn ctrl_c_token() -> CancellationToken {
    let token = CancellationToken::new();
    let ctrl_c_token = token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for Ctrl+C");
            return;
        }
        info!("Ctrl+C received, initiating shutdown");
        ctrl_c_token.cancel();
    });
    token
}
