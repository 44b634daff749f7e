//! TCP listener.
//!
//! # Responsibilities
//! - Bind to the configured host and port
//! - Expose the bound address (port 0 resolves to an ephemeral port)
//! - Hand the socket to the plaintext or TLS server
//!
//! # Design Decisions
//! - Binding is the last startup step; failure is fatal
//! - Backpressure is the kernel accept queue, there is no admission layer

use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address.
    Bind { address: String, source: std::io::Error },
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind { address, source } => {
                write!(f, "Failed to bind {}: {}", address, source)
            }
        }
    }
}

impl std::error::Error for ListenerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ListenerError::Bind { source, .. } => Some(source),
        }
    }
}

/// A bound TCP listener.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
}

impl Listener {
    /// Bind to `host:port`. `host` may be an IP literal or a resolvable name.
    pub async fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let address = format!("{}:{}", host, port);
        let inner = TcpListener::bind((host.trim_matches(|c| c == '[' || c == ']'), port))
            .await
            .map_err(|source| ListenerError::Bind {
                address: address.clone(),
                source,
            })?;

        let local_addr = inner
            .local_addr()
            .map_err(|source| ListenerError::Bind { address, source })?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, std::io::Error> {
        self.inner.local_addr()
    }

    /// Tokio listener for the plaintext server.
    pub fn into_inner(self) -> TcpListener {
        self.inner
    }

    /// Non-blocking std listener for the TLS server.
    pub fn into_std(self) -> Result<std::net::TcpListener, std::io::Error> {
        self.inner.into_std()
    }
}
