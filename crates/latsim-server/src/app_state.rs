//! Shared application state.
//!
//! Built once before any listener is bound. Owns the metrics registry, the
//! request families registered into it, and the simulator. Startup errors
//! (bad bucket layout, duplicate family names) surface as `Result`.

use std::sync::Arc;

use latsim_core::error::Result;
use latsim_core::metrics::Registry;

use crate::config::LatSimConfig;
use crate::obs::HttpMetrics;
use crate::simulate::Simulator;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: LatSimConfig,
    registry: Registry,
    http_metrics: HttpMetrics,
    simulator: Simulator,
}

impl AppState {
    pub fn new(cfg: LatSimConfig) -> Result<Self> {
        let mut registry = Registry::new();
        let http_metrics = HttpMetrics::register(&mut registry, &cfg.metrics)?;
        let simulator = Simulator::new(cfg.simulation.clone());

        tracing::info!(families = ?registry.family_names(), "metrics registry ready");

        Ok(Self {
            inner: Arc::new(AppStateInner {
                cfg,
                registry,
                http_metrics,
                simulator,
            }),
        })
    }

    pub fn cfg(&self) -> &LatSimConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn http_metrics(&self) -> &HttpMetrics {
        &self.inner.http_metrics
    }

    pub fn simulator(&self) -> &Simulator {
        &self.inner.simulator
    }
}
