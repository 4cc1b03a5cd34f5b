//! latsim server library entry.
//!
//! Wires config, the simulated endpoints, the request interceptor and the
//! scrape endpoint into an axum stack. Consumed by the binary (`main.rs`) and
//! by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod router;
pub mod simulate;
