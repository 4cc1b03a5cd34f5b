#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::time::Duration;

use axum::http::StatusCode;
use rand::{rngs::StdRng, SeedableRng};

use latsim_server::config::SimulationConfig;
use latsim_server::simulate::{Simulator, FAILURE_STATUSES};

fn sim(success_chance: u32, fast_chance: u32) -> Simulator {
    Simulator::new(SimulationConfig {
        success_chance,
        fast_chance,
        ..SimulationConfig::default()
    })
}

#[test]
fn latency_stays_within_configured_range() {
    let s = sim(90, 95);
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..10_000 {
        let l = s.latency(&mut rng);
        assert!(l >= Duration::from_millis(1) && l <= Duration::from_millis(1000), "{l:?}");
    }
}

#[test]
fn fast_chance_splits_latency_ranges() {
    let mut rng = StdRng::seed_from_u64(11);

    let always_fast = sim(90, 100);
    for _ in 0..2_000 {
        assert!(always_fast.latency(&mut rng) <= Duration::from_millis(300));
    }

    let never_fast = sim(90, 0);
    for _ in 0..2_000 {
        let l = never_fast.latency(&mut rng);
        assert!(l > Duration::from_millis(300) && l <= Duration::from_millis(1000), "{l:?}");
    }
}

#[test]
fn success_chance_controls_status() {
    let mut rng = StdRng::seed_from_u64(3);

    let always_ok = sim(100, 95);
    for _ in 0..2_000 {
        assert_eq!(always_ok.status(&mut rng), StatusCode::OK);
    }

    let never_ok = sim(0, 95);
    let mut seen = Vec::new();
    for _ in 0..2_000 {
        let status = never_ok.status(&mut rng);
        assert!(FAILURE_STATUSES.contains(&status), "{status}");
        if !seen.contains(&status) {
            seen.push(status);
        }
    }
    assert_eq!(seen.len(), FAILURE_STATUSES.len());
}

#[test]
fn default_mix_is_mostly_successful() {
    let s = sim(90, 95);
    let mut rng = StdRng::seed_from_u64(42);
    let ok = (0..10_000)
        .filter(|_| s.outcome(&mut rng).status == StatusCode::OK)
        .count();
    assert!((8_500..=9_500).contains(&ok), "ok={ok}");
}
