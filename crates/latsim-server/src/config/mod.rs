//! Config loader (strict parsing) and command-line overrides.

pub mod cli;
pub mod schema;

use std::fs;

use latsim_core::error::{LatSimError, Result};

pub use cli::Cli;
pub use schema::{LatSimConfig, MetricsSection, ServerSection, SimulationConfig};

pub fn load_from_file(path: &str) -> Result<LatSimConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| LatSimError::InvalidConfig(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<LatSimConfig> {
    let cfg: LatSimConfig = serde_yaml::from_str(s)
        .map_err(|e| LatSimError::InvalidConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
