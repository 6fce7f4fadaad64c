//! HTTP endpoints.
//!
//! - `/`        : service index
//! - `/health`  : liveness
//! - `/hello`   : greeting, optional `name` query
//! - `/metrics` : Prometheus text format
//! - fallback   : JSON 404

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use obsdemo_core::error::ObsError;
use obsdemo_core::protocol::{ErrorBody, Greeting, HealthStatus, HelloQuery, ServiceIndex};

use crate::app_state::AppState;
use crate::obs::metrics::CONTENT_TYPE;

pub async fn root() -> Json<ServiceIndex> {
    Json(ServiceIndex::default())
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus::ok())
}

pub async fn hello(Query(pairs): Query<Vec<(String, String)>>) -> Json<Greeting> {
    let q = HelloQuery::from_pairs(pairs);
    Json(Greeting::for_name(q.name.as_deref()))
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state.metrics().export();

    (StatusCode::OK, [(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response()
}

pub async fn not_found() -> Response {
    error_response(&ObsError::NotFound)
}

/// Render an `ObsError` as a JSON body with its mapped status.
pub fn error_response(err: &ObsError) -> Response {
    let status = StatusCode::from_u16(err.client_code().http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::from(err))).into_response()
}
