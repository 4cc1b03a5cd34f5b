use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{Collector, Desc};
use crate::error::{LatSimError, Result};

/// Per-series state.
///
/// `buckets[i]` counts observations that landed in bucket `i` only; the last
/// slot is the overflow above the highest bound. Cumulative counts are
/// produced at render time, so a concurrent reader always sees
/// non-decreasing `le` buckets and `+Inf == _count`.
#[derive(Debug)]
struct AtomicHistogram {
    sum: AtomicU64,
    buckets: Box<[AtomicU64]>,
}

impl AtomicHistogram {
    fn new(bounds: usize) -> Self {
        Self {
            sum: AtomicU64::new(0),
            buckets: (0..=bounds).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn snapshot(&self, bounds: &[u64]) -> HistogramSnapshot {
        let mut cumulative = 0;
        let mut buckets = Vec::with_capacity(bounds.len());
        for (i, &le) in bounds.iter().enumerate() {
            cumulative += self.buckets[i].load(Ordering::Relaxed);
            buckets.push((le, cumulative));
        }
        cumulative += self.buckets[bounds.len()].load(Ordering::Relaxed);
        HistogramSnapshot {
            buckets,
            count: cumulative,
            sum: self.sum.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of one histogram series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistogramSnapshot {
    /// `(upper bound, cumulative count)` per finite bucket.
    pub buckets: Vec<(u64, u64)>,
    /// Total observations; equals the `+Inf` bucket.
    pub count: u64,
    pub sum: u64,
}

impl HistogramSnapshot {
    /// Cumulative count for the bucket with bound `le`.
    pub fn bucket(&self, le: u64) -> Option<u64> {
        self.buckets.iter().find(|(b, _)| *b == le).map(|(_, c)| *c)
    }
}

/// Histogram family with fixed integer bucket bounds.
#[derive(Debug)]
pub struct HistogramVec {
    desc: Desc,
    bounds: Vec<u64>,
    map: DashMap<Vec<String>, AtomicHistogram>,
}

impl HistogramVec {
    /// `bounds` must be non-empty and strictly increasing; `+Inf` is implicit.
    pub fn new(name: &str, help: &str, labels: &[&str], bounds: &[u64]) -> Result<Self> {
        if labels.contains(&"le") {
            return Err(LatSimError::InvalidLabelName("le".into()));
        }
        if bounds.is_empty() {
            return Err(LatSimError::InvalidBuckets("at least one bound is required".into()));
        }
        if bounds.windows(2).any(|w| w[0] >= w[1]) {
            return Err(LatSimError::InvalidBuckets(format!(
                "bounds must be strictly increasing: {bounds:?}"
            )));
        }
        Ok(Self {
            desc: Desc::new(name, help, labels)?,
            bounds: bounds.to_vec(),
            map: DashMap::new(),
        })
    }

    pub fn bounds(&self) -> &[u64] {
        &self.bounds
    }

    /// Record one observation.
    pub fn observe(&self, values: &[&str], v: u64) {
        let Some(key) = self.desc.key(values) else {
            return;
        };
        // First bound >= v, or the overflow slot.
        let idx = self.bounds.partition_point(|&b| b < v);

        if let Some(hist) = self.map.get(&key) {
            hist.buckets[idx].fetch_add(1, Ordering::Relaxed);
            hist.sum.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let n = self.bounds.len();
        let hist = self.map.entry(key).or_insert_with(|| AtomicHistogram::new(n));
        hist.buckets[idx].fetch_add(1, Ordering::Relaxed);
        hist.sum.fetch_add(v, Ordering::Relaxed);
    }

    /// Snapshot of one series, `None` if it was never observed.
    pub fn snapshot(&self, values: &[&str]) -> Option<HistogramSnapshot> {
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.map.get(&key).map(|h| h.snapshot(&self.bounds))
    }

    /// Number of distinct label tuples seen so far.
    pub fn series_count(&self) -> usize {
        self.map.len()
    }
}

impl Collector for HistogramVec {
    fn name(&self) -> &str {
        &self.desc.name
    }

    fn encode(&self, out: &mut String) {
        self.desc.write_header("histogram", out);
        let name = &self.desc.name;

        let mut rows: Vec<(Vec<String>, HistogramSnapshot)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().snapshot(&self.bounds)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, snap) in rows {
            let label_str = self.desc.label_str(&key);
            let prefix = if label_str.is_empty() {
                String::new()
            } else {
                format!("{},", label_str)
            };

            for (le, count) in &snap.buckets {
                let _ = writeln!(out, "{}_bucket{{{}le=\"{}\"}} {}", name, prefix, le, count);
            }
            let _ = writeln!(out, "{}_bucket{{{}le=\"+Inf\"}} {}", name, prefix, snap.count);

            if label_str.is_empty() {
                let _ = writeln!(out, "{}_sum {}", name, snap.sum);
                let _ = writeln!(out, "{}_count {}", name, snap.count);
            } else {
                let _ = writeln!(out, "{}_sum{{{}}} {}", name, label_str, snap.sum);
                let _ = writeln!(out, "{}_count{{{}}} {}", name, label_str, snap.count);
            }
        }
    }
}
