//! Simulated endpoints.
//!
//! Each request sleeps for a random latency and answers with a random status.
//! Latency: with probability `fast_chance`% it is uniform in
//! `[1, fast_duration_ms]`, otherwise uniform in
//! `(fast_duration_ms, max_duration_ms]`.
//! Status: 200 with probability `success_chance`%, otherwise 400 or 504.

use std::time::Duration;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use rand::Rng;
use serde_json::json;

use crate::app_state::AppState;
use crate::config::SimulationConfig;

/// Failure statuses, picked with equal probability.
pub const FAILURE_STATUSES: [StatusCode; 2] =
    [StatusCode::BAD_REQUEST, StatusCode::GATEWAY_TIMEOUT];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub latency: Duration,
    pub status: StatusCode,
}

#[derive(Debug, Clone)]
pub struct Simulator {
    cfg: SimulationConfig,
}

impl Simulator {
    pub fn new(cfg: SimulationConfig) -> Self {
        Self { cfg }
    }

    pub fn cfg(&self) -> &SimulationConfig {
        &self.cfg
    }

    pub fn latency<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let fast = rng.gen_range(1..=100) <= self.cfg.fast_chance;
        let ms = if fast {
            rng.gen_range(1..=self.cfg.fast_duration_ms)
        } else {
            rng.gen_range(self.cfg.fast_duration_ms + 1..=self.cfg.max_duration_ms)
        };
        Duration::from_millis(ms)
    }

    pub fn status<R: Rng + ?Sized>(&self, rng: &mut R) -> StatusCode {
        if rng.gen_range(1..=100) <= self.cfg.success_chance {
            return StatusCode::OK;
        }
        FAILURE_STATUSES[rng.gen_range(0..FAILURE_STATUSES.len())]
    }

    pub fn outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Outcome {
        Outcome {
            latency: self.latency(rng),
            status: self.status(rng),
        }
    }
}

/// `GET /ping/:id/status` and `GET /ping/:id/info`.
pub async fn ping(State(state): State<AppState>) -> impl IntoResponse {
    // ThreadRng is !Send; draw before the first await.
    let outcome = state.simulator().outcome(&mut rand::thread_rng());
    tokio::time::sleep(outcome.latency).await;

    (outcome.status, Json(json!({ "response": "pong" })))
}
