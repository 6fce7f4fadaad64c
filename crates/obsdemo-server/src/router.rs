//! Axum router wiring.
//!
//! The metrics middleware is layered last so it wraps every route and the fallback.

use axum::{middleware, routing::get, Router};

use crate::{app_state::AppState, obs::middleware::track_requests, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ops::root))
        .route("/health", get(ops::health))
        .route("/hello", get(ops::hello))
        .route("/metrics", get(ops::metrics))
        .fallback(ops::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}
