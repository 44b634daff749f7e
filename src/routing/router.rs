//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes
//! - Look up the single handler for a request
//! - Report a method mismatch on the matched rule instead of falling through
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over a handful of rules
//! - Total: the static catch-all is always last, so every path resolves

use axum::http::Method;
use thiserror::Error;

use crate::config::schema::{DEFAULT_PROXY_PREFIXES, HEALTH_PATH};
use crate::routing::matcher::PathPattern;

/// Handler a rule dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    Health,
    Proxy,
    Static,
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRule {
    pub pattern: PathPattern,
    pub kind: HandlerKind,
    /// Accepted methods. `None` accepts any method.
    pub methods: Option<Vec<Method>>,
}

impl RouteRule {
    fn accepts(&self, method: &Method) -> bool {
        self.methods
            .as_ref()
            .map_or(true, |allowed| allowed.contains(method))
    }
}

/// Outcome of a route lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteMatch {
    /// Dispatch to this handler.
    Handler(HandlerKind),
    /// The path belongs to `kind` but the method is not accepted there.
    MethodNotAllowed { kind: HandlerKind, allow: Vec<Method> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("proxy prefix '{0}' must start with '/'")]
    InvalidPrefix(String),

    #[error("path '{0}' is claimed by more than one route")]
    Duplicate(String),
}

/// Ordered route rules: health, proxy prefixes (longest first), static catch-all.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build the table with the default proxy prefixes plus `extra_prefixes`.
    pub fn new(extra_prefixes: &[String]) -> Result<Self, RouteError> {
        if let Some(bad) = extra_prefixes.iter().find(|p| !p.starts_with('/')) {
            return Err(RouteError::InvalidPrefix(bad.clone()));
        }

        let prefixes = DEFAULT_PROXY_PREFIXES
            .iter()
            .map(|p| p.to_string())
            .chain(extra_prefixes.iter().cloned());
        let rules = compile(prefixes);

        let mut claimed: Vec<&str> = Vec::with_capacity(rules.len());
        for rule in &rules {
            let literal = rule.pattern.literal();
            if claimed.contains(&literal) {
                return Err(RouteError::Duplicate(literal.to_string()));
            }
            claimed.push(literal);
        }

        Ok(Self { rules })
    }

    /// The table with only the default proxy prefixes.
    pub fn with_defaults() -> Self {
        Self {
            rules: compile(DEFAULT_PROXY_PREFIXES.iter().map(|p| p.to_string())),
        }
    }

    /// Select the handler for a request.
    pub fn resolve(&self, method: &Method, path: &str) -> RouteMatch {
        let Some(rule) = self.rules.iter().find(|rule| rule.pattern.matches(path)) else {
            return RouteMatch::Handler(HandlerKind::Static);
        };

        if rule.accepts(method) {
            RouteMatch::Handler(rule.kind)
        } else {
            RouteMatch::MethodNotAllowed {
                kind: rule.kind,
                allow: rule.methods.clone().unwrap_or_default(),
            }
        }
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    /// Proxied prefixes in evaluation order.
    pub fn proxy_prefixes(&self) -> impl Iterator<Item = &str> {
        self.rules
            .iter()
            .filter(|r| r.kind == HandlerKind::Proxy)
            .map(|r| r.pattern.literal())
    }
}

fn compile(prefixes: impl Iterator<Item = String>) -> Vec<RouteRule> {
    let mut proxies: Vec<RouteRule> = prefixes
        .map(|prefix| RouteRule {
            pattern: PathPattern::Prefix(prefix),
            kind: HandlerKind::Proxy,
            methods: None,
        })
        .collect();
    // Longest prefix first so the most specific rule wins.
    proxies.sort_by_key(|r| std::cmp::Reverse(r.pattern.literal().len()));

    let mut rules = Vec::with_capacity(proxies.len() + 2);
    rules.push(RouteRule {
        pattern: PathPattern::Exact(HEALTH_PATH.to_string()),
        kind: HandlerKind::Health,
        methods: Some(vec![Method::GET]),
    });
    rules.extend(proxies);
    rules.push(RouteRule {
        pattern: PathPattern::CatchAll,
        kind: HandlerKind::Static,
        methods: Some(vec![Method::GET, Method::HEAD]),
    });
    rules
}
