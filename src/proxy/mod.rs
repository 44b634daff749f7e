//! Reverse proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Request under a proxy prefix
//!     → forwarder.rs (URI rewrite onto the upstream origin)
//!     → headers.rs (strip hop-by-hop, add X-Forwarded-*)
//!     → transport.rs (pooled hyper client, rustls per ProxyTransportPolicy)
//!     → LibreSBC API
//!     → headers.rs (strip hop-by-hop) → caller
//! ```

pub mod forwarder;
pub mod headers;
pub mod transport;

pub use forwarder::{upstream_uri, Forwarder};
pub use transport::{build_connector, TransportError, CONNECT_TIMEOUT};
