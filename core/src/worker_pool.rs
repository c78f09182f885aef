// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Job, JobReceiver, UpdateCoordinator};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Fixed set of workers draining the job queue into the coordinator
pub struct WorkerPool {
    cancellation_token: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Starts `worker_count` workers on `receiver`.
    ///
    /// Workers run until `cancellation_token` is cancelled or the queue is
    /// closed. A job that is already being processed always completes.
    pub fn spawn(
        worker_count: usize,
        receiver: JobReceiver,
        coordinator: Arc<UpdateCoordinator>,
        cancellation_token: CancellationToken,
    ) -> Self {
        let handles = (0..worker_count)
            .map(|id| {
                tokio::spawn(run_worker(
                    id,
                    receiver.clone(),
                    coordinator.clone(),
                    cancellation_token.clone(),
                ))
            })
            .collect();

        info!(worker_count, "Worker pool started");

        Self {
            cancellation_token,
            handles,
        }
    }

    /// Returns a clone of the cancellation token for external control
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation_token.clone()
    }

    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Stops the workers and waits for them to finish
    pub async fn shutdown(self) {
        self.cancellation_token.cancel();
        for (id, handle) in self.handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!(worker = id, error = %e, "Worker task failed");
            }
        }
        info!("Worker pool stopped");
    }
}

async fn run_worker(
    id: usize,
    receiver: JobReceiver,
    coordinator: Arc<UpdateCoordinator>,
    cancellation_token: CancellationToken,
) {
    debug!(worker = id, "Worker started");

    loop {
        let job = tokio::select! {
            _ = cancellation_token.cancelled() => break,
            job = receiver.recv() => match job {
                Some(job) => job,
                None => break,
            },
        };

        process_job(id, &coordinator, job).await;
    }

    debug!(worker = id, "Worker stopped");
}

async fn process_job(id: usize, coordinator: &UpdateCoordinator, job: Job) {
    let Job { request, responder } = job;

    // The caller gave up while the job was queued
    if responder.is_closed() {
        debug!(worker = id, field = request.field(), "Caller gone, skipping update");
        return;
    }

    let field = request.field().to_string();
    let result = coordinator.apply(request).await;

    match &result {
        Ok(outcome) => info!(
            worker = id,
            field = %outcome.field,
            new_value = outcome.new_value,
            "Updated document"
        ),
        Err(e) if e.is_client_error() => {
            warn!(worker = id, field = %field, error = %e, "Update rejected")
        }
        Err(e) => error!(worker = id, field = %field, error = %e, "Update failed"),
    }

    if responder.send(result).is_err() {
        debug!(worker = id, field = %field, "Caller gone before the answer was sent");
    }
}
