//! Request observability: the metrics registry and the middleware feeding it.
//!
//! Metrics are stored in-process and rendered by the `/metrics` handler in
//! Prometheus text format.

pub mod metrics;
pub mod middleware;

pub use metrics::MetricsRegistry;
