// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! HTTP intake: `POST /add-to-firestore` with `{"field": "...", "value": n}`.
//!
//! The handler only decodes and enqueues. It then waits for the worker that
//! picked up the job and turns its result into a plain-text reply.

use crate::{JobQueue, JobResult, QueueError, UpdateError, UpdateRequest};
use std::convert::Infallible;
use tokio::sync::oneshot;
use tracing::debug;
use warp::{
    http::StatusCode,
    hyper::body::Bytes,
    reply::{self, Response},
    Filter, Rejection, Reply,
};

pub const ADD_TO_FIRESTORE_PATH: &str = "add-to-firestore";

pub const INVALID_PAYLOAD_MESSAGE: &str = "Invalid request payload";

/// Largest accepted request body, in bytes
pub const MAX_BODY_BYTES: u64 = 4 * 1024;

/// Decimal exponent from which values are rendered as `d.ddde+XX`
const EXPONENT_FORM_THRESHOLD: i32 = 6;

/// All routes served by the process
pub fn routes(queue: JobQueue) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    warp::path(ADD_TO_FIRESTORE_PATH)
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(MAX_BODY_BYTES))
        .and(warp::body::bytes())
        .and(with_queue(queue))
        .then(add_to_firestore)
}

fn with_queue(queue: JobQueue) -> impl Filter<Extract = (JobQueue,), Error = Infallible> + Clone {
    warp::any().map(move || queue.clone())
}

async fn add_to_firestore(body: Bytes, queue: JobQueue) -> Response {
    let request = match UpdateRequest::from_json(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "Rejected request payload");
            return text_reply(StatusCode::BAD_REQUEST, INVALID_PAYLOAD_MESSAGE);
        }
    };

    // Blocks while the queue is full
    let pending = match queue.submit(request).await {
        Ok(pending) => pending,
        Err(e) => return text_reply(StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };
    debug!(free_slots = queue.available(), "Job accepted");

    job_reply(pending.await)
}

fn job_reply(answer: Result<JobResult, oneshot::error::RecvError>) -> Response {
    match answer {
        Ok(Ok(outcome)) => text_reply(
            StatusCode::OK,
            success_message(&outcome.field, outcome.new_value),
        ),
        Ok(Err(e)) => text_reply(status_for(&e), e.to_string()),
        // Worker pool went away with the job still queued
        Err(_) => text_reply(StatusCode::SERVICE_UNAVAILABLE, QueueError::Closed.to_string()),
    }
}

pub fn success_message(field: &str, new_value: f64) -> String {
    format!(
        "Successfully updated document. Field '{}' new value: {}",
        field,
        format_value(new_value)
    )
}

/// Shortest round-trip digits, switching to exponent form when the decimal
/// exponent is below -4 or at least 6: `12.5`, `3`, `123456`, `1e+06`,
/// `1.2345675e+06`, `1e-05`.
pub fn format_value(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return value.to_string();
    }

    // `{:e}` yields the shortest mantissa, e.g. "1.2345675e6" or "-1e-5"
    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => (mantissa, exponent),
            Err(_) => return value.to_string(),
        },
        None => return value.to_string(),
    };

    if exponent < -4 || exponent >= EXPONENT_FORM_THRESHOLD {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        value.to_string()
    }
}

pub fn status_for(error: &UpdateError) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn text_reply(status: StatusCode, body: impl Into<String>) -> Response {
    reply::with_status(body.into(), status).into_response()
}
