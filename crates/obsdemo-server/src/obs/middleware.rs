//! Request metrics middleware.
//!
//! Applied once over the whole router (routes and fallback) with
//! `axum::middleware::from_fn_with_state`. Every response the server produces
//! is recorded exactly once, including panics converted to 500.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures_util::FutureExt;

use obsdemo_core::error::ObsError;

use crate::app_state::AppState;
use crate::ops::error_response;

pub async fn track_requests(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();

    let response = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(resp) => resp,
        Err(payload) => {
            tracing::error!(%method, %path, panic = panic_message(&*payload), "handler panicked");
            error_response(&ObsError::Internal("handler panicked".into()))
        }
    };

    let elapsed = start.elapsed();
    let status = response.status().as_u16();
    state.metrics().record(&method, &path, status, elapsed);

    tracing::debug!(
        %method,
        %path,
        status,
        latency_ms = elapsed.as_secs_f64() * 1000.0,
        "request completed"
    );
    response
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}
