//! obsdemo server library entry.
//!
//! Wires the metrics registry, the request-tracking middleware, and the
//! handlers into an axum router. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
