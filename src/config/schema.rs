//! Configuration schema definitions.
//!
//! Every value here is built once by [`crate::config::loader`] and is never
//! mutated afterwards. Subsystems receive the pieces they need by reference
//! or by clone at construction time.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::routing::RouteTable;

/// Path answered by the health probe.
pub const HEALTH_PATH: &str = "/healthcheck";

/// Prefixes that are always forwarded to the LibreSBC API.
pub const DEFAULT_PROXY_PREFIXES: &[&str] = &["/libreapi", "/apidocs", "/openapi.json"];

/// Root configuration for the web UI server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind host (IP or resolvable name).
    pub host: String,

    /// Bind port.
    pub port: u16,

    /// Backend API the proxy forwards to.
    pub upstream: UpstreamTarget,

    /// Inbound TLS settings. `None` serves plaintext HTTP.
    pub tls: Option<TlsConfig>,

    /// Verbose logging.
    pub debug: bool,

    /// Compiled route rules.
    pub routes: RouteTable,

    /// Directory holding the static UI bundle.
    pub asset_root: PathBuf,

    /// Trust policy for the outbound leg to the upstream.
    pub transport: ProxyTransportPolicy,
}

impl ServerConfig {
    /// `host:port` string handed to the listener.
    pub fn listen_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// URL an operator should open in a browser.
    pub fn access_url(&self) -> String {
        match &self.tls {
            Some(tls) if self.port == 443 => format!("https://{}", tls.domain),
            Some(tls) => format!("https://{}:{}", tls.domain, self.port),
            None => format!("http://{}", self.listen_address()),
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to certificate chain (PEM).
    pub cert_path: PathBuf,

    /// Path to private key (PEM).
    pub key_path: PathBuf,

    /// Public hostname the certificate is issued for.
    pub domain: String,
}

/// URL scheme of the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamScheme {
    Http,
    Https,
}

impl UpstreamScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpstreamScheme::Http => "http",
            UpstreamScheme::Https => "https",
        }
    }
}

/// Parsed origin of the backend API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    pub scheme: UpstreamScheme,
    pub host: String,
    pub port: u16,
    /// Path component of the configured URL, without a trailing slash.
    /// Empty when the URL names a bare origin.
    pub base_path: String,
    /// Query component of the configured URL, if any.
    pub query: Option<String>,
}

impl UpstreamTarget {
    /// Build a target from an already parsed URL.
    ///
    /// Returns `None` for schemes other than http/https or URLs without a host.
    pub fn from_url(url: &Url) -> Option<Self> {
        let scheme = match url.scheme() {
            "http" => UpstreamScheme::Http,
            "https" => UpstreamScheme::Https,
            _ => return None,
        };
        let host = url.host_str()?.to_string();
        let port = url.port_or_known_default()?;
        let base_path = url.path().trim_end_matches('/').to_string();

        Some(Self {
            scheme,
            host,
            port,
            base_path,
            query: url.query().map(str::to_string),
        })
    }

    /// `host:port` authority used in outbound request URIs.
    pub fn authority(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn is_tls(&self) -> bool {
        self.scheme == UpstreamScheme::Https
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}{}", self.scheme.as_str(), self.authority(), self.base_path)
    }
}

/// Trust policy for TLS connections to the upstream.
///
/// The LibreSBC API usually runs next to this server with a self-signed or
/// internally issued certificate, so chain validation is skipped unless a CA
/// bundle is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTransportPolicy {
    /// Accept any certificate chain. Handshake signatures are still checked.
    pub skip_verify: bool,

    /// Extra trust anchors (PEM) used when `skip_verify` is false.
    pub ca_file: Option<PathBuf>,
}

impl ProxyTransportPolicy {
    /// Validate the upstream chain against platform roots plus `ca_file`.
    pub fn strict(ca_file: Option<PathBuf>) -> Self {
        Self {
            skip_verify: false,
            ca_file,
        }
    }
}

impl Default for ProxyTransportPolicy {
    fn default() -> Self {
        Self {
            skip_verify: true,
            ca_file: None,
        }
    }
}
