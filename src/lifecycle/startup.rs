//! Startup orchestration.
//!
//! # Responsibilities
//! - Load TLS material, the asset bundle, and the upstream transport
//! - Bind the listener and spawn the server task
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal and returned, never acted on here
//! - Listeners start last, so a bad certificate or bundle never opens a port

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::task::JoinHandle;

use crate::assets::{AssetBundle, AssetError};
use crate::config::{ConfigError, ServerConfig};
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::net::{load_tls_config, Listener, ListenerError, TlsError};
use crate::proxy::{Forwarder, TransportError};

/// Errors that end the process.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to load TLS certificate/key pair: {0}")]
    Tls(#[from] TlsError),

    #[error("failed to load web UI bundle: {0}")]
    Assets(#[from] AssetError),

    #[error("failed to set up upstream transport: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Listener(#[from] ListenerError),

    #[error("web service failed: {0}")]
    Serve(#[from] std::io::Error),
}

impl StartupError {
    /// Short name of the step that failed, for structured logs.
    pub fn action(&self) -> &'static str {
        match self {
            StartupError::Config(ConfigError::InvalidUpstream { .. })
            | StartupError::Config(ConfigError::UnsupportedUpstream(_)) => "urlparse",
            StartupError::Config(_) => "config",
            StartupError::Tls(_) => "tls",
            StartupError::Assets(_) => "assets",
            StartupError::Transport(_) => "transport",
            StartupError::Listener(_) => "listen",
            StartupError::Serve(_) => "serve",
        }
    }
}

/// A server that is bound and accepting connections.
#[derive(Debug)]
pub struct RunningServer {
    local_addr: SocketAddr,
    tls: bool,
    task: JoinHandle<Result<(), std::io::Error>>,
}

impl RunningServer {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_tls(&self) -> bool {
        self.tls
    }

    /// Wait for the server task to finish.
    pub async fn wait(self) -> Result<(), StartupError> {
        match self.task.await {
            Ok(result) => result.map_err(StartupError::Serve),
            Err(join) => Err(StartupError::Serve(std::io::Error::other(join))),
        }
    }
}

/// Prepare every subsystem from `config`, bind, and start serving.
pub async fn launch(config: &ServerConfig, shutdown: &Shutdown) -> Result<RunningServer, StartupError> {
    let tls = config.tls.as_ref().map(load_tls_config).transpose()?;
    let assets = AssetBundle::load(&config.asset_root)?;
    let forwarder = Forwarder::new(config.upstream.clone(), &config.transport, tls.is_some())?;

    tracing::info!(
        upstream = %forwarder.upstream(),
        proxy_prefixes = ?config.routes.proxy_prefixes().collect::<Vec<_>>(),
        assets = assets.len(),
        verify_upstream = !config.transport.skip_verify,
        "Subsystems initialized"
    );

    let state = AppState {
        routes: Arc::new(config.routes.clone()),
        forwarder,
        assets: Arc::new(assets),
    };
    let server = HttpServer::new(state, tls);
    let is_tls = server.is_tls();

    let listener = Listener::bind(&config.host, config.port).await?;
    let local_addr = listener.local_addr()?;

    let task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    Ok(RunningServer {
        local_addr,
        tls: is_tls,
        task,
    })
}
