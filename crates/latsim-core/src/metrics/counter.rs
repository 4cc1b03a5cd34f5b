use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::{Collector, Desc};
use crate::error::Result;

/// Monotonic counter family partitioned by label values.
#[derive(Debug)]
pub struct CounterVec {
    desc: Desc,
    map: DashMap<Vec<String>, AtomicU64>,
}

impl CounterVec {
    pub fn new(name: &str, help: &str, labels: &[&str]) -> Result<Self> {
        Ok(Self {
            desc: Desc::new(name, help, labels)?,
            map: DashMap::new(),
        })
    }

    /// Increment by 1.
    pub fn inc(&self, values: &[&str]) {
        self.add(values, 1);
    }

    /// Increment by an arbitrary value.
    pub fn add(&self, values: &[&str], v: u64) {
        let Some(key) = self.desc.key(values) else {
            return;
        };

        // Existing series only need a shard read lock.
        if let Some(counter) = self.map.get(&key) {
            counter.fetch_add(v, Ordering::Relaxed);
            return;
        }
        let counter = self.map.entry(key).or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(v, Ordering::Relaxed);
    }

    /// Current value of one series (0 if it was never observed).
    pub fn get(&self, values: &[&str]) -> u64 {
        let key: Vec<String> = values.iter().map(|v| v.to_string()).collect();
        self.map
            .get(&key)
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    /// Number of distinct label tuples seen so far.
    pub fn series_count(&self) -> usize {
        self.map.len()
    }
}

impl Collector for CounterVec {
    fn name(&self) -> &str {
        &self.desc.name
    }

    fn encode(&self, out: &mut String) {
        self.desc.write_header("counter", out);

        let mut rows: Vec<(Vec<String>, u64)> = self
            .map
            .iter()
            .map(|r| (r.key().clone(), r.value().load(Ordering::Relaxed)))
            .collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        for (key, val) in rows {
            let label_str = self.desc.label_str(&key);
            if label_str.is_empty() {
                let _ = writeln!(out, "{} {}", self.desc.name, val);
            } else {
                let _ = writeln!(out, "{}{{{}}} {}", self.desc.name, label_str, val);
            }
        }
    }
}
