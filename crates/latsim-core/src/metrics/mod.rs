//! Minimal metrics registry.
//!
//! Counter and histogram families with declared label names, backed by
//! `DashMap` for lazy per-series creation and atomics for every accumulator.
//! A series key is the ordered vector of label values, matching the order the
//! family declared its label names. Histogram observations are whole units
//! (milliseconds for request latency) to avoid floating point math.
//!
//! Rendering follows the Prometheus text exposition format (0.0.4).

mod counter;
mod histogram;
mod registry;

pub use counter::CounterVec;
pub use histogram::{HistogramSnapshot, HistogramVec};
pub use registry::{Collector, Registry};

use std::fmt::Write;

use crate::error::{LatSimError, Result};

/// Content type of a rendered registry.
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Escape a label value.
fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

/// Escape a HELP docstring.
fn escape_help(v: &str) -> String {
    v.replace('\\', "\\\\").replace('\n', "\\n")
}

/// `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}

/// `[a-zA-Z_][a-zA-Z0-9_]*`, `__` prefix reserved.
pub fn is_valid_label_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.starts_with("__") && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name, help and label schema shared by every family type.
#[derive(Debug)]
struct Desc {
    name: String,
    help: String,
    labels: Vec<String>,
}

impl Desc {
    fn new(name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        if !is_valid_metric_name(name) {
            return Err(LatSimError::InvalidMetricName(name.to_string()));
        }
        for (i, l) in labels.iter().enumerate() {
            if !is_valid_label_name(l) || labels[..i].contains(l) {
                return Err(LatSimError::InvalidLabelName(l.to_string()));
            }
        }
        Ok(Self {
            name: name.to_string(),
            help: help.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
        })
    }

    /// Build the series key. Returns `None` (and warns) on arity mismatch;
    /// the observation is dropped rather than failing the caller.
    fn key(&self, values: &[&str]) -> Option<Vec<String>> {
        if values.len() != self.labels.len() {
            tracing::warn!(
                metric = %self.name,
                expected = self.labels.len(),
                got = values.len(),
                "label arity mismatch, observation dropped"
            );
            return None;
        }
        Some(values.iter().map(|v| v.to_string()).collect())
    }

    /// `k1="v1",k2="v2"` for one series.
    fn label_str(&self, values: &[String]) -> String {
        self.labels
            .iter()
            .zip(values)
            .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn write_header(&self, kind: &str, out: &mut String) {
        let _ = writeln!(out, "# HELP {} {}", self.name, escape_help(&self.help));
        let _ = writeln!(out, "# TYPE {} {}", self.name, kind);
    }
}
