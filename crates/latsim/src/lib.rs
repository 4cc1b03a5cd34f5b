//! Top-level facade crate for latsim.
//!
//! Re-exports the metrics core and the server library so users can depend on a single crate.

pub mod core {
    pub use latsim_core::*;
}

pub mod server {
    pub use latsim_server::*;
}
