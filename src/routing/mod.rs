//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate path patterns)
//!     → Return: handler kind, or method-not-allowed for the matched rule
//!
//! Route Compilation (at startup):
//!     health path + proxy prefixes
//!     → Sort proxy prefixes longest first
//!     → Append static catch-all
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always matches same route
//! - First match wins; the catch-all guarantees a match

pub mod matcher;
pub mod router;

pub use matcher::PathPattern;
pub use router::{HandlerKind, RouteError, RouteMatch, RouteRule, RouteTable};
