//! Configuration validation.
//!
//! # Responsibilities
//! - Parse and check the upstream URL
//! - Enforce the TLS invariants (domain present, `crt:key` syntax, files exist)
//! - Surface route table conflicts
//!
//! # Design Decisions
//! - Validation is pure apart from file existence checks
//! - First failure wins; every error is fatal at startup

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

use crate::config::schema::{TlsConfig, UpstreamTarget};
use crate::routing::RouteError;

/// Errors raised while turning flags into a [`crate::config::ServerConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to parse libresbc web API URL '{url}': {source}")]
    InvalidUpstream {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("libresbc web API URL '{0}' must use http or https and name a host")]
    UnsupportedUpstream(String),

    #[error("domain is required for SSL/TLS")]
    MissingDomain,

    #[error("invalid syntax declare for tls cert files '{0}', eg. crt:key")]
    InvalidCertsSyntax(String),

    #[error("certificate file not found: {}", .0.display())]
    CertificateNotFound(PathBuf),

    #[error("private key file not found: {}", .0.display())]
    KeyNotFound(PathBuf),

    #[error(transparent)]
    Routes(#[from] RouteError),
}

/// Parse the upstream origin.
pub fn parse_upstream(raw: &str) -> Result<UpstreamTarget, ConfigError> {
    let url = Url::parse(raw).map_err(|source| ConfigError::InvalidUpstream {
        url: raw.to_string(),
        source,
    })?;
    UpstreamTarget::from_url(&url).ok_or_else(|| ConfigError::UnsupportedUpstream(raw.to_string()))
}

/// Split a `crt:key` declaration into its two paths.
///
/// Exactly one colon is accepted and neither side may be empty.
pub fn split_certs(certs: &str) -> Result<(PathBuf, PathBuf), ConfigError> {
    let mut parts = certs.split(':');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(cert), Some(key), None) if !cert.is_empty() && !key.is_empty() => {
            Ok((PathBuf::from(cert), PathBuf::from(key)))
        }
        _ => Err(ConfigError::InvalidCertsSyntax(certs.to_string())),
    }
}

/// Build the inbound TLS settings from the `domain` and `certs` flags.
pub fn validate_tls(domain: &str, certs: &str) -> Result<TlsConfig, ConfigError> {
    if domain.trim().is_empty() {
        return Err(ConfigError::MissingDomain);
    }
    let (cert_path, key_path) = split_certs(certs)?;
    ensure_file(&cert_path).map_err(ConfigError::CertificateNotFound)?;
    ensure_file(&key_path).map_err(ConfigError::KeyNotFound)?;

    Ok(TlsConfig {
        cert_path,
        key_path,
        domain: domain.trim().to_string(),
    })
}

fn ensure_file(path: &Path) -> Result<(), PathBuf> {
    if path.is_file() {
        Ok(())
    } else {
        Err(path.to_path_buf())
    }
}
