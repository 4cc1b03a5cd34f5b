use std::net::SocketAddr;

use serde::Deserialize;
use latsim_core::error::{LatSimError, Result};
use latsim_core::metrics::is_valid_metric_name;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LatSimConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub metrics: MetricsSection,

    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for LatSimConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            metrics: MetricsSection::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl LatSimConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(LatSimError::UnsupportedVersion);
        }

        let listen = self.server.listen_addr()?;
        self.metrics.validate()?;
        if self.metrics.listen_addr()? == Some(listen) {
            return Err(LatSimError::InvalidConfig(
                "metrics.listen must differ from server.listen".into(),
            ));
        }
        self.simulation.validate()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self { listen: default_listen() }
    }
}

impl ServerSection {
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            LatSimError::InvalidConfig(format!("server.listen {:?}: {e}", self.listen))
        })
    }
}

/// Where and how the scrape endpoint is served.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    #[serde(default = "default_metrics_path")]
    pub path: String,

    /// Separate listener for the scrape endpoint. `None` shares `server.listen`.
    #[serde(default)]
    pub listen: Option<String>,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default = "default_latency_buckets_ms")]
    pub latency_buckets_ms: Vec<u64>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            path: default_metrics_path(),
            listen: None,
            namespace: default_namespace(),
            latency_buckets_ms: default_latency_buckets_ms(),
        }
    }
}

impl MetricsSection {
    pub fn listen_addr(&self) -> Result<Option<SocketAddr>> {
        self.listen
            .as_deref()
            .map(|l| {
                l.parse().map_err(|e| {
                    LatSimError::InvalidConfig(format!("metrics.listen {l:?}: {e}"))
                })
            })
            .transpose()
    }

    pub fn validate(&self) -> Result<()> {
        if !self.path.starts_with('/') || self.path.len() < 2 {
            return Err(LatSimError::InvalidConfig(
                "metrics.path must start with '/' and name a path".into(),
            ));
        }
        if self.path.contains(|c| matches!(c, ':' | '*' | '{' | '}')) {
            return Err(LatSimError::InvalidConfig(format!(
                "metrics.path {:?} must be a literal path without parameters or wildcards",
                self.path
            )));
        }
        if self.path == "/healthz" || self.path.starts_with("/ping/") {
            return Err(LatSimError::InvalidConfig(format!(
                "metrics.path {:?} collides with another route",
                self.path
            )));
        }
        if !is_valid_metric_name(&self.namespace) {
            return Err(LatSimError::InvalidConfig(format!(
                "metrics.namespace {:?} is not a valid metric name prefix",
                self.namespace
            )));
        }
        if self.latency_buckets_ms.is_empty()
            || self.latency_buckets_ms.windows(2).any(|w| w[0] >= w[1])
        {
            return Err(LatSimError::InvalidConfig(
                "metrics.latency_buckets_ms must be non-empty and strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_metrics_path() -> String {
    "/metrics".into()
}
fn default_namespace() -> String {
    "example".into()
}
fn default_latency_buckets_ms() -> Vec<u64> {
    vec![100, 200, 300, 400, 500, 600, 700, 800, 900, 1000]
}

/// Knobs of the simulated endpoints. Chances are percentages.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Share of requests answered with 200.
    #[serde(default = "default_success_chance")]
    pub success_chance: u32,

    /// Share of requests that finish within `fast_duration_ms`.
    #[serde(default = "default_fast_chance")]
    pub fast_chance: u32,

    #[serde(default = "default_fast_duration_ms")]
    pub fast_duration_ms: u64,

    #[serde(default = "default_max_duration_ms")]
    pub max_duration_ms: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            success_chance: default_success_chance(),
            fast_chance: default_fast_chance(),
            fast_duration_ms: default_fast_duration_ms(),
            max_duration_ms: default_max_duration_ms(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        if self.success_chance > 100 {
            return Err(LatSimError::InvalidConfig(
                "simulation.success_chance must be between 0 and 100".into(),
            ));
        }
        if self.fast_chance > 100 {
            return Err(LatSimError::InvalidConfig(
                "simulation.fast_chance must be between 0 and 100".into(),
            ));
        }
        if self.fast_duration_ms == 0 {
            return Err(LatSimError::InvalidConfig(
                "simulation.fast_duration_ms must be at least 1".into(),
            ));
        }
        if !(self.fast_duration_ms.saturating_add(1)..=60000).contains(&self.max_duration_ms) {
            return Err(LatSimError::InvalidConfig(
                "simulation.max_duration_ms must be greater than fast_duration_ms and at most 60000"
                    .into(),
            ));
        }
        Ok(())
    }
}

fn default_success_chance() -> u32 {
    90
}
fn default_fast_chance() -> u32 {
    95
}
fn default_fast_duration_ms() -> u64 {
    300
}
fn default_max_duration_ms() -> u64 {
    1000
}
