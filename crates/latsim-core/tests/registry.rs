//! Registry, counter and histogram behavior.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use latsim_core::metrics::{Collector, CounterVec, HistogramVec, Registry};

const BUCKETS: [u64; 10] = [100, 200, 300, 400, 500, 600, 700, 800, 900, 1000];

fn requests() -> Arc<CounterVec> {
    Arc::new(
        CounterVec::new(
            "example_requests_count",
            "Request counter",
            &["method", "route", "status"],
        )
        .unwrap(),
    )
}

fn latency() -> Arc<HistogramVec> {
    Arc::new(
        HistogramVec::new(
            "example_request_latency_ms",
            "Request latency",
            &["method", "route"],
            &BUCKETS,
        )
        .unwrap(),
    )
}

#[test]
fn counter_counts_every_increment() {
    let c = requests();
    for _ in 0..37 {
        c.inc(&["GET", "/ping/:id/status", "200"]);
    }
    c.inc(&["GET", "/ping/:id/status", "504"]);

    assert_eq!(c.get(&["GET", "/ping/:id/status", "200"]), 37);
    assert_eq!(c.get(&["GET", "/ping/:id/status", "504"]), 1);
    assert_eq!(c.get(&["GET", "/ping/:id/info", "200"]), 0);
    assert_eq!(c.series_count(), 2);
}

#[test]
fn histogram_buckets_are_cumulative() {
    let h = latency();
    let values = [0u64, 50, 100, 101, 250, 999, 1000, 1001, 5000];
    for v in values {
        h.observe(&["GET", "/x"], v);
    }

    let snap = h.snapshot(&["GET", "/x"]).unwrap();
    for &b in &BUCKETS {
        let expected = values.iter().filter(|&&v| v <= b).count() as u64;
        assert_eq!(snap.bucket(b), Some(expected), "le={b}");
    }
    assert_eq!(snap.count, values.len() as u64);
    assert_eq!(snap.sum, values.iter().sum::<u64>());
}

#[test]
fn single_observation_lands_in_first_bound_at_or_above() {
    let h = latency();
    h.observe(&["GET", "/ping/:id/status"], 250);

    let snap = h.snapshot(&["GET", "/ping/:id/status"]).unwrap();
    assert_eq!(snap.bucket(100), Some(0));
    assert_eq!(snap.bucket(200), Some(0));
    for b in [300, 400, 500, 600, 700, 800, 900, 1000] {
        assert_eq!(snap.bucket(b), Some(1), "le={b}");
    }
    assert_eq!(snap.count, 1);
}

#[test]
fn arity_mismatch_is_dropped() {
    let c = requests();
    c.inc(&["GET", "/x"]);
    c.inc(&["GET", "/x", "200", "extra"]);
    assert_eq!(c.series_count(), 0);

    let h = latency();
    h.observe(&["GET"], 10);
    assert_eq!(h.series_count(), 0);
}

#[test]
fn duplicate_family_is_rejected() {
    let mut reg = Registry::new();
    reg.register(requests()).unwrap();
    reg.register(latency()).unwrap();

    let err = reg.register(requests()).expect_err("must fail");
    assert_eq!(err.code().as_str(), "DUPLICATE_FAMILY");
    assert_eq!(reg.family_names(), vec!["example_requests_count", "example_request_latency_ms"]);
}

#[test]
fn invalid_names_and_buckets_are_rejected() {
    let err = CounterVec::new("9bad", "", &[]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_METRIC_NAME");

    let err = CounterVec::new("ok", "", &["__reserved"]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = CounterVec::new("ok", "", &["a", "a"]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = HistogramVec::new("ok", "", &["le"], &[1]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = HistogramVec::new("ok", "", &[], &[]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_BUCKETS");

    let err = HistogramVec::new("ok", "", &[], &[200, 100]).expect_err("must fail");
    assert_eq!(err.code().as_str(), "INVALID_BUCKETS");
}

#[test]
fn export_renders_exposition_format() {
    let mut reg = Registry::new();
    let c = requests();
    let h = Arc::new(HistogramVec::new("lat", "Latency", &["route"], &[100, 200]).unwrap());
    reg.register(Arc::clone(&c)).unwrap();
    reg.register(Arc::clone(&h)).unwrap();

    c.inc(&["GET", "/b", "200"]);
    c.inc(&["GET", "/a", "200"]);
    c.inc(&["GET", "/a", "200"]);
    h.observe(&["/a"], 150);

    let expected = "\
# HELP example_requests_count Request counter
# TYPE example_requests_count counter
example_requests_count{method=\"GET\",route=\"/a\",status=\"200\"} 2
example_requests_count{method=\"GET\",route=\"/b\",status=\"200\"} 1
# HELP lat Latency
# TYPE lat histogram
lat_bucket{route=\"/a\",le=\"100\"} 0
lat_bucket{route=\"/a\",le=\"200\"} 1
lat_bucket{route=\"/a\",le=\"+Inf\"} 1
lat_sum{route=\"/a\"} 150
lat_count{route=\"/a\"} 1
";
    assert_eq!(reg.export(), expected);
}

#[test]
fn label_values_are_escaped() {
    let c = CounterVec::new("esc", "line one\nline two", &["v"]).unwrap();
    c.inc(&["a\"b\\c\nd"]);

    let mut out = String::new();
    c.encode(&mut out);
    assert!(out.contains("# HELP esc line one\\nline two\n"));
    assert!(out.contains("esc{v=\"a\\\"b\\\\c\\nd\"} 1\n"));
}

#[test]
fn export_is_idempotent() {
    let mut reg = Registry::new();
    let c = requests();
    let h = latency();
    reg.register(Arc::clone(&c)).unwrap();
    reg.register(Arc::clone(&h)).unwrap();

    for (i, route) in ["/a", "/b", "/c", "/d", "/e"].into_iter().enumerate() {
        c.inc(&["GET", route, "200"]);
        h.observe(&["GET", route], (i as u64) * 170);
    }

    let first = reg.export();
    let second = reg.export();
    assert_eq!(first, second);
}

#[test]
fn concurrent_increments_are_not_lost() {
    let c = requests();
    let h = latency();

    std::thread::scope(|s| {
        for t in 0..8u64 {
            let c = &c;
            let h = &h;
            s.spawn(move || {
                for i in 0..125u64 {
                    c.inc(&["GET", "/ping/:id/status", "200"]);
                    h.observe(&["GET", "/ping/:id/status"], (t * 125 + i) % 1200);
                }
            });
        }
    });

    assert_eq!(c.get(&["GET", "/ping/:id/status", "200"]), 1000);
    let snap = h.snapshot(&["GET", "/ping/:id/status"]).unwrap();
    assert_eq!(snap.count, 1000);
}
