//! Health checking subsystem.
//!
//! # Design Decisions
//! - Liveness only: the probe never contacts the LibreSBC upstream, so a
//!   supervisor keeps the UI up while the backend restarts
//! - Fixed response, no state

pub mod probe;

pub use probe::{probe_response, HEALTH_BODY};
