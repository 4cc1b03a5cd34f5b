//! Command-line flags.
//!
//! Flags override the YAML file; the merged result is validated again.

use std::path::Path;

use clap::Parser;
use latsim_core::error::Result;

use super::{load_from_file, LatSimConfig};

/// Read when `--config` is absent and the file exists.
pub const DEFAULT_CONFIG_PATH: &str = "latsim.yaml";

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "latsim-server")]
#[command(
    about = "HTTP service with simulated latency and status codes, instrumented for Prometheus"
)]
#[command(version)]
pub struct Cli {
    /// YAML config file
    #[arg(short, long, env = "LATSIM_CONFIG")]
    pub config: Option<String>,

    /// Listen address of the simulated endpoints
    #[arg(long, env = "LATSIM_LISTEN")]
    pub listen: Option<String>,

    /// Serve the scrape endpoint on its own listener
    #[arg(long = "metrics-listen", env = "LATSIM_METRICS_LISTEN")]
    pub metrics_listen: Option<String>,

    /// Percentage of requests that succeed with 200
    #[arg(long = "success-chance")]
    pub success_chance: Option<u32>,

    /// Percentage of requests faster than --fast-duration
    #[arg(long = "fast-chance")]
    pub fast_chance: Option<u32>,

    /// Maximum duration of fast requests, in milliseconds
    #[arg(long = "fast-duration")]
    pub fast_duration: Option<u64>,
}

impl Cli {
    /// Resolve the effective config: file (explicit, default path, or
    /// built-in defaults), then flag overrides, then validation.
    pub fn load(&self) -> Result<LatSimConfig> {
        let mut cfg = match &self.config {
            Some(path) => load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from_file(DEFAULT_CONFIG_PATH)?,
            None => LatSimConfig::default(),
        };
        self.apply(&mut cfg);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn apply(&self, cfg: &mut LatSimConfig) {
        if let Some(listen) = &self.listen {
            cfg.server.listen = listen.clone();
        }
        if let Some(listen) = &self.metrics_listen {
            cfg.metrics.listen = Some(listen.clone());
        }
        if let Some(v) = self.success_chance {
            cfg.simulation.success_chance = v;
        }
        if let Some(v) = self.fast_chance {
            cfg.simulation.fast_chance = v;
        }
        if let Some(v) = self.fast_duration {
            cfg.simulation.fast_duration_ms = v;
        }
    }
}
