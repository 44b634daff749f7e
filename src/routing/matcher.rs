//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefixes are plain string prefixes: `/libreapifoo` matches `/libreapi`
//! - No regex to guarantee O(n) matching

use std::fmt;

/// Condition a request path is tested against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    /// Whole path must equal the literal.
    Exact(String),
    /// Path must start with the literal.
    Prefix(String),
    /// Matches every path.
    CatchAll,
}

impl PathPattern {
    /// Returns true if `path` satisfies this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
            PathPattern::CatchAll => true,
        }
    }

    /// The literal path a rule claims. Two rules claiming the same literal conflict.
    pub fn literal(&self) -> &str {
        match self {
            PathPattern::Exact(path) | PathPattern::Prefix(path) => path,
            PathPattern::CatchAll => "/",
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(path) => write!(f, "={path}"),
            PathPattern::Prefix(prefix) => write!(f, "{prefix}*"),
            PathPattern::CatchAll => write!(f, "/*"),
        }
    }
}
