//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → request spans (http/server.rs) carrying the request id
//!
//! Consumers:
//!     → stderr via the fmt layer, filtered by RUST_LOG or --debug
//! ```

pub mod logging;
