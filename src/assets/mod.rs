//! Static asset subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     --webroot directory
//!     → bundle.rs (read every file, require index.html)
//!     → AssetBundle (immutable, shared via Arc)
//!
//! Request:
//!     path → normalized key → exact file | directory index | SPA fallback
//! ```

pub mod bundle;

pub use bundle::{Asset, AssetBundle, AssetError, Resolved, INDEX_DOCUMENT};
