//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, HTTP/1.1 and HTTP/2)
//!     → request.rs (request id)
//!     → routing (RouteTable::resolve)
//!     → health probe | proxy forwarder | asset bundle
//!     → response.rs (error statuses)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer};
