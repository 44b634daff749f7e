//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     tls.rs (load PEM pair, build rustls ServerConfig)   [TLS only]
//!     → listener.rs (bind host:port)
//!
//! Runtime:
//!     accepted TCP connection
//!     → optional TLS handshake (axum-server rustls acceptor)
//!     → HTTP layer
//!
//! States:
//!     Unbound → Listening (plaintext | TLS) → Stopped
//! ```
//!
//! # Design Decisions
//! - Certificate problems surface before the socket is bound
//! - No restart state: fatal errors end the process and a supervisor restarts it

pub mod listener;
pub mod tls;

pub use listener::{Listener, ListenerError};
pub use tls::{load_tls_config, TlsError};
