//! Outbound transport to the upstream.
//!
//! # Responsibilities
//! - Build the rustls client configuration from a [`ProxyTransportPolicy`]
//! - Wrap a plain `HttpConnector` so `http` and `https` upstreams share one client
//!
//! # Design Decisions
//! - Skip-verify replaces only the chain check: TLS is still negotiated and
//!   handshake signatures are still verified against the peer's key
//! - Strict mode trusts platform roots plus an optional PEM bundle

use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use hyper_rustls::{HttpsConnector, HttpsConnectorBuilder};
use hyper_util::client::legacy::connect::HttpConnector;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use thiserror::Error;

use crate::config::ProxyTransportPolicy;

/// TCP connect timeout towards the upstream.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connector used by the forwarding client.
pub type UpstreamConnector = HttpsConnector<HttpConnector>;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to read upstream CA bundle {}: {source}", .path.display())]
    CaRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("upstream CA bundle {} contains no certificates", .0.display())]
    EmptyCa(PathBuf),

    #[error("no trust anchors available for upstream certificate verification")]
    NoRoots,

    #[error("invalid TLS client configuration: {0}")]
    Tls(#[from] rustls::Error),
}

/// Build the connector for `policy`.
pub fn build_connector(policy: &ProxyTransportPolicy) -> Result<UpstreamConnector, TransportError> {
    let tls = client_config(policy)?;

    let mut http = HttpConnector::new();
    http.enforce_http(false);
    http.set_connect_timeout(Some(CONNECT_TIMEOUT));
    http.set_nodelay(true);

    Ok(HttpsConnectorBuilder::new()
        .with_tls_config(tls)
        .https_or_http()
        .enable_http1()
        .enable_http2()
        .wrap_connector(http))
}

/// rustls client configuration for `policy`.
pub fn client_config(policy: &ProxyTransportPolicy) -> Result<ClientConfig, TransportError> {
    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let builder =
        ClientConfig::builder_with_provider(provider.clone()).with_safe_default_protocol_versions()?;

    let config = if policy.skip_verify {
        builder
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(SkipChainVerification { provider }))
            .with_no_client_auth()
    } else {
        builder
            .with_root_certificates(root_store(policy.ca_file.as_deref())?)
            .with_no_client_auth()
    };
    Ok(config)
}

fn root_store(ca_file: Option<&Path>) -> Result<RootCertStore, TransportError> {
    let mut roots = RootCertStore::empty();

    let native = rustls_native_certs::load_native_certs();
    for error in &native.errors {
        tracing::debug!(error = %error, "Skipping unreadable platform certificate");
    }
    let (added, ignored) = roots.add_parsable_certificates(native.certs);
    tracing::debug!(added, ignored, "Loaded platform trust anchors");

    if let Some(path) = ca_file {
        let read_err = |source| TransportError::CaRead {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(read_err)?;
        let certs = rustls_pemfile::certs(&mut BufReader::new(file))
            .collect::<Result<Vec<_>, _>>()
            .map_err(read_err)?;
        if certs.is_empty() {
            return Err(TransportError::EmptyCa(path.to_path_buf()));
        }
        for cert in certs {
            roots.add(cert)?;
        }
    }

    if roots.is_empty() {
        return Err(TransportError::NoRoots);
    }
    Ok(roots)
}

/// Accepts any certificate chain but still checks handshake signatures.
#[derive(Debug)]
struct SkipChainVerification {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for SkipChainVerification {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(message, cert, dss, &self.provider.signature_verification_algorithms)
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}
