//! Single-upstream request forwarding.
//!
//! # Responsibilities
//! - Rewrite the request URI onto the upstream origin
//! - Relay method, headers (minus hop-by-hop) and streaming body
//! - Relay the upstream response unchanged apart from hop-by-hop headers
//!
//! # Design Decisions
//! - One attempt per request: bodies are streams and may not be replayable
//! - Path and query pass through; an upstream base path is joined in front
//! - Transport errors become 502/504, they never escape as panics or retries

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{header, HeaderValue, Request, Uri, Version};
use axum::response::{IntoResponse, Response};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};

use crate::config::{ProxyTransportPolicy, UpstreamTarget};
use crate::http::response::{gateway_error, gateway_status};
use crate::proxy::headers::{apply_forwarded, strip_hop_by_hop};
use crate::proxy::transport::{build_connector, TransportError, UpstreamConnector};

/// Forwards matched requests to the LibreSBC API.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<UpstreamConnector, Body>,
    upstream: Arc<UpstreamTarget>,
    inbound_proto: &'static str,
}

impl Forwarder {
    /// Create a forwarder for `upstream` using the outbound `policy`.
    ///
    /// `inbound_tls` only affects the `X-Forwarded-Proto` value.
    pub fn new(
        upstream: UpstreamTarget,
        policy: &ProxyTransportPolicy,
        inbound_tls: bool,
    ) -> Result<Self, TransportError> {
        let connector = build_connector(policy)?;
        let client = Client::builder(TokioExecutor::new()).build(connector);

        if upstream.is_tls() && policy.skip_verify {
            tracing::warn!(
                upstream = %upstream,
                "Upstream certificate verification disabled"
            );
        }

        Ok(Self {
            client,
            upstream: Arc::new(upstream),
            inbound_proto: if inbound_tls { "https" } else { "http" },
        })
    }

    pub fn upstream(&self) -> &UpstreamTarget {
        &self.upstream
    }

    /// Forward `request` and relay the upstream response.
    pub async fn forward(&self, request: Request<Body>, peer: Option<SocketAddr>) -> Response {
        let (mut parts, body) = request.into_parts();

        let uri = match upstream_uri(&self.upstream, &parts.uri) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(path = %parts.uri, error = %e, "Cannot build upstream URI");
                return (axum::http::StatusCode::BAD_GATEWAY, "Upstream request failed")
                    .into_response();
            }
        };

        let original_host = inbound_host(&parts);
        strip_hop_by_hop(&mut parts.headers);
        parts.headers.remove(header::HOST);
        apply_forwarded(
            &mut parts.headers,
            peer.map(|addr| addr.ip()),
            self.inbound_proto,
            original_host,
        );

        tracing::debug!(
            method = %parts.method,
            upstream_uri = %uri,
            "Forwarding request"
        );

        parts.uri = uri;
        // The connector negotiates h2 via ALPN; inbound h2 must not leak into an h1 upstream.
        parts.version = Version::HTTP_11;
        let method = parts.method.clone();
        let upstream_uri = parts.uri.clone();

        match self.client.request(Request::from_parts(parts, body)).await {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                strip_hop_by_hop(&mut parts.headers);
                tracing::debug!(
                    method = %method,
                    upstream_uri = %upstream_uri,
                    status = %parts.status,
                    "Upstream responded"
                );
                Response::from_parts(parts, Body::new(body))
            }
            Err(e) => {
                tracing::warn!(
                    method = %method,
                    upstream_uri = %upstream_uri,
                    status = %gateway_status(&e),
                    error = %e,
                    "Upstream error"
                );
                gateway_error(&e)
            }
        }
    }
}

impl std::fmt::Debug for Forwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forwarder")
            .field("upstream", &self.upstream.to_string())
            .field("inbound_proto", &self.inbound_proto)
            .finish()
    }
}

/// Host the client addressed: the `Host` header, or the URI authority for
/// HTTP/2 requests that carry `:authority` instead.
fn inbound_host(parts: &Parts) -> Option<HeaderValue> {
    parts.headers.get(header::HOST).cloned().or_else(|| {
        parts
            .uri
            .authority()
            .and_then(|authority| HeaderValue::from_str(authority.as_str()).ok())
    })
}

/// Target URI for `original` on `upstream`.
pub fn upstream_uri(upstream: &UpstreamTarget, original: &Uri) -> Result<Uri, axum::http::Error> {
    let path = join_path(&upstream.base_path, original.path());
    let query = match (upstream.query.as_deref(), original.query()) {
        (Some(base), Some(q)) if !base.is_empty() => Some(format!("{base}&{q}")),
        (Some(base), None) if !base.is_empty() => Some(base.to_string()),
        (_, Some(q)) => Some(q.to_string()),
        _ => None,
    };
    let path_and_query = match query {
        Some(q) => format!("{path}?{q}"),
        None => path,
    };

    Uri::builder()
        .scheme(upstream.scheme.as_str())
        .authority(upstream.authority())
        .path_and_query(path_and_query)
        .build()
}

fn join_path(base: &str, path: &str) -> String {
    match (base.is_empty(), path.starts_with('/')) {
        (true, true) => path.to_string(),
        (true, false) => format!("/{path}"),
        (false, true) => format!("{base}{path}"),
        (false, false) => format!("{base}/{path}"),
    }
}
