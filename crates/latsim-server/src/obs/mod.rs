//! Request instrumentation.
//!
//! `HttpMetrics` owns the two request families and registers them at startup;
//! `track_requests` is the axum middleware that feeds them.

pub mod middleware;

use std::sync::Arc;

use latsim_core::error::Result;
use latsim_core::metrics::{CounterVec, HistogramVec, Registry};

use crate::config::MetricsSection;

pub use middleware::{method_label, track_requests, OTHER_METHOD, UNMATCHED_ROUTE};

/// Request counter and latency histogram.
#[derive(Clone)]
pub struct HttpMetrics {
    pub requests: Arc<CounterVec>,
    pub latency_ms: Arc<HistogramVec>,
}

impl HttpMetrics {
    /// Build both families under `cfg.namespace` and register them.
    /// Fails if either name is already registered.
    pub fn register(registry: &mut Registry, cfg: &MetricsSection) -> Result<Self> {
        let requests = Arc::new(CounterVec::new(
            &format!("{}_requests_count", cfg.namespace),
            "Request counter per method, route and status code",
            &["method", "route", "status"],
        )?);
        let latency_ms = Arc::new(HistogramVec::new(
            &format!("{}_request_latency_ms", cfg.namespace),
            "Histogram for request latency in milliseconds",
            &["method", "route"],
            &cfg.latency_buckets_ms,
        )?);

        registry.register(Arc::clone(&requests))?;
        registry.register(Arc::clone(&latency_ms))?;

        Ok(Self { requests, latency_ms })
    }

    /// Fold one completed request into both families.
    pub fn record(&self, method: &str, route: &str, status: u16, elapsed_ms: u64) {
        let status = status.to_string();
        self.requests.inc(&[method, route, &status]);
        self.latency_ms.observe(&[method, route], elapsed_ms);
    }
}
