//! latsim core: the metrics registry and the shared error surface.
//!
//! This crate holds the label-partitioned counter and histogram families, the
//! registry that owns them, and the Prometheus text encoder. It carries no
//! HTTP or runtime dependencies so the registry can be exercised in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! A bad observation is dropped with a warning; it never takes a request down.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metrics;

/// Shared result type.
pub use error::{ErrorCode, LatSimError, Result};
