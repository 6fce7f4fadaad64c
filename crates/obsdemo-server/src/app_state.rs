//! Shared application state.
//!
//! Holds the validated config and the metrics registry. The registry is
//! created here, once per state, and handed to the middleware and the
//! `/metrics` handler through axum's `State`.

use std::net::SocketAddr;
use std::sync::Arc;

use obsdemo_core::error::Result;

use crate::config::ServiceConfig;
use crate::obs::MetricsRegistry;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<MetricsRegistry>,
}

struct AppStateInner {
    cfg: ServiceConfig,
    listen: SocketAddr,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ServiceConfig) -> Result<Self> {
        cfg.validate()?;
        let listen = cfg.server.listen_addr()?;

        Ok(Self {
            inner: Arc::new(AppStateInner { cfg, listen }),
            metrics: Arc::new(MetricsRegistry::new()),
        })
    }

    pub fn cfg(&self) -> &ServiceConfig {
        &self.inner.cfg
    }

    pub fn listen(&self) -> SocketAddr {
        self.inner.listen
    }

    pub fn metrics(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }
}
