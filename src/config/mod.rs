//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! command-line flags (cli.rs)
//!     → loader.rs (assemble)
//!     → validation.rs (upstream URL, TLS invariants, route conflicts)
//!     → ServerConfig (validated, immutable)
//!     → passed by reference to startup, then cloned into subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no reload
//! - No process-wide state: the value is handed to constructors explicitly
//! - Any validation error aborts startup before a listener is bound

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::{
    ProxyTransportPolicy, ServerConfig, TlsConfig, UpstreamScheme, UpstreamTarget,
    DEFAULT_PROXY_PREFIXES, HEALTH_PATH,
};
pub use validation::ConfigError;
