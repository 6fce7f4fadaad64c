//! HTTP payload contracts.
//!
//! Every JSON body the server emits is a typed struct here, so the wire shape
//! is pinned by serde derives rather than ad-hoc `json!` literals.

pub mod payload;

pub use payload::{ErrorBody, Greeting, HealthStatus, HelloQuery, ServiceIndex};
