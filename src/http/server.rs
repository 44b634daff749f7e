//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the single dispatch handler
//! - Wire up middleware (request id, tracing)
//! - Serve plaintext or TLS on an already bound listener
//! - Dispatch each request to the health probe, forwarder, or asset bundle

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::assets::AssetBundle;
use crate::health::probe_response;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::method_not_allowed;
use crate::net::Listener;
use crate::proxy::Forwarder;
use crate::routing::{HandlerKind, RouteMatch, RouteTable};

/// Time the TLS front waits for in-flight requests after shutdown is signalled.
pub const TLS_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub forwarder: Forwarder,
    pub assets: Arc<AssetBundle>,
}

/// HTTP server for the web UI.
pub struct HttpServer {
    router: Router,
    tls: Option<RustlsConfig>,
}

impl HttpServer {
    /// Create a server; `tls` switches the front to HTTPS.
    pub fn new(state: AppState, tls: Option<RustlsConfig>) -> Self {
        Self {
            router: Self::build_router(state),
            tls,
        }
    }

    /// Build the Axum router with all middleware layers.
    pub fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %request.request_id().unwrap_or("unknown"),
                )
            }))
            .layer(set_request_id_layer())
    }

    /// The router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn is_tls(&self) -> bool {
        self.tls.is_some()
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: Listener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        match self.tls {
            None => {
                tracing::info!(address = %addr, tls = false, "HTTP server starting");
                axum::serve(listener.into_inner(), app)
                    .with_graceful_shutdown(async move {
                        let _ = shutdown.recv().await;
                        tracing::info!("Shutdown signal received");
                    })
                    .await?;
            }
            Some(tls) => {
                tracing::info!(address = %addr, tls = true, "HTTP server starting");
                let handle = axum_server::Handle::new();
                let trigger = handle.clone();
                tokio::spawn(async move {
                    let _ = shutdown.recv().await;
                    tracing::info!("Shutdown signal received");
                    trigger.graceful_shutdown(Some(TLS_DRAIN_TIMEOUT));
                });

                axum_server::from_tcp_rustls(listener.into_std()?, tls)
                    .handle(handle)
                    .serve(app)
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Route the request to exactly one handler.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match state.routes.resolve(&method, &path) {
        RouteMatch::Handler(HandlerKind::Health) => probe_response(),
        RouteMatch::Handler(HandlerKind::Proxy) => state.forwarder.forward(request, peer).await,
        RouteMatch::Handler(HandlerKind::Static) => state.assets.respond(&method, &path),
        RouteMatch::MethodNotAllowed { kind, allow } => {
            tracing::debug!(method = %method, path = %path, handler = ?kind, "Method not allowed");
            method_not_allowed(&allow)
        }
    }
}
