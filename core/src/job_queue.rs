// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{UpdateError, UpdateOutcome, UpdateRequest};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, Mutex};

pub type JobResult = Result<UpdateOutcome, UpdateError>;

/// An update waiting for a worker, paired with the handle its answer goes to
pub struct Job {
    pub request: UpdateRequest,
    pub responder: oneshot::Sender<JobResult>,
}

impl Job {
    pub fn new(request: UpdateRequest) -> (Self, oneshot::Receiver<JobResult>) {
        let (responder, pending) = oneshot::channel();
        (Self { request, responder }, pending)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// No worker will ever pick the job up
    #[error("Service is shutting down")]
    Closed,
}

/// Creates a bounded FIFO queue holding at most `capacity` pending jobs
pub fn job_queue(capacity: usize) -> (JobQueue, JobReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (
        JobQueue { tx },
        JobReceiver {
            rx: Arc::new(Mutex::new(rx)),
        },
    )
}

/// Intake side of the queue
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<Job>,
}

impl JobQueue {
    /// Enqueues `job`, waiting for a free slot while the queue is full.
    ///
    /// Jobs are never dropped or rejected for lack of room. The only failure
    /// is a queue with no receiver left.
    pub async fn enqueue(&self, job: Job) -> Result<(), QueueError> {
        self.tx.send(job).await.map_err(|_| QueueError::Closed)
    }

    /// Wraps `request` in a job, enqueues it and returns the pending answer
    pub async fn submit(
        &self,
        request: UpdateRequest,
    ) -> Result<oneshot::Receiver<JobResult>, QueueError> {
        let (job, pending) = Job::new(request);
        self.enqueue(job).await?;
        Ok(pending)
    }

    /// Free slots right now
    pub fn available(&self) -> usize {
        self.tx.capacity()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer side of the queue, shared by every worker.
///
/// Workers take turns on a single receiver, so jobs leave the queue in
/// arrival order whatever the pool size.
#[derive(Clone)]
pub struct JobReceiver {
    rx: Arc<Mutex<mpsc::Receiver<Job>>>,
}

impl JobReceiver {
    /// Receive the next job
    /// Returns None once every `JobQueue` handle is gone and the queue is drained
    pub async fn recv(&self) -> Option<Job> {
        self.rx.lock().await.recv().await
    }
}
