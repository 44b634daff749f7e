//! Shared utilities for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use rcgen::{BasicConstraints, CertificateParams, DnType, IsCa, KeyPair};
use serde_json::{json, Map, Value};
use tempfile::TempDir;

use libre_webui::cli::Cli;
use libre_webui::config::load_config;
use libre_webui::lifecycle::{launch, RunningServer};
use libre_webui::Shutdown;

pub const INDEX_HTML: &str = "<!doctype html><title>LibreSBC</title><div id=app></div>";
pub const APP_JS: &str = "console.log('libresbc');";
pub const CALL_FLOW_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"/>";

/// Header that makes the echo upstream answer with a given status.
pub const ECHO_STATUS: &str = "x-echo-status";

/// Header that makes the echo upstream add a connection-scoped header.
pub const ECHO_HOP: &str = "x-echo-hop";

/// Response header the echo upstream lists in `Connection`.
pub const UPSTREAM_HINT: &str = "x-upstream-hint";

/// Write a small UI bundle into a fresh temporary directory.
pub fn write_bundle() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    std::fs::create_dir(dir.path().join("assets")).unwrap();
    std::fs::write(dir.path().join("assets").join("app.js"), APP_JS).unwrap();
    std::fs::write(dir.path().join("assets").join("call flow.svg"), CALL_FLOW_SVG).unwrap();
    std::fs::write(dir.path().join("favicon.ico"), [0u8, 0, 1, 0]).unwrap();
    dir
}

/// Upstream that answers every request with a JSON description of it.
pub fn echo_router() -> Router {
    Router::new().fallback(echo)
}

async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Response {
    let status = headers
        .get(ECHO_STATUS)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u16>().ok())
        .and_then(|code| StatusCode::from_u16(code).ok())
        .unwrap_or(StatusCode::OK);

    let header_map: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();

    let payload = json!({
        "method": method.as_str(),
        "path": uri.path(),
        "query": uri.query(),
        "headers": header_map,
        "body": String::from_utf8_lossy(&body),
    });
    let mut response = (status, Json(payload)).into_response();
    if headers.contains_key(ECHO_HOP) {
        let out = response.headers_mut();
        out.insert(header::CONNECTION, HeaderValue::from_static(UPSTREAM_HINT));
        out.insert(UPSTREAM_HINT, HeaderValue::from_static("upstream-only"));
        out.insert("x-upstream-kept", HeaderValue::from_static("yes"));
    }
    response
}

/// Start the echo upstream over plain HTTP.
pub async fn start_echo_upstream() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, echo_router()).await;
    });
    addr
}

/// Start the echo upstream over HTTPS with the given PEM pair.
pub fn start_tls_echo_upstream(dir: &Path, cert_pem: &str, key_pem: &str) -> SocketAddr {
    let (cert, key) = write_pem_pair(dir, "upstream", cert_pem, key_pem);
    let config = libre_webui::net::tls::server_config(&cert, &key).unwrap();

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();

    let server = axum_server::from_tcp_rustls(listener, RustlsConfig::from_config(Arc::new(config)))
        .serve(echo_router().into_make_service());
    tokio::spawn(async move {
        let _ = server.await;
    });
    addr
}

/// A port with nothing listening on it.
pub fn dead_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

pub fn write_pem_pair(dir: &Path, stem: &str, cert_pem: &str, key_pem: &str) -> (PathBuf, PathBuf) {
    let cert = dir.join(format!("{stem}.crt"));
    let key = dir.join(format!("{stem}.key"));
    std::fs::write(&cert, cert_pem).unwrap();
    std::fs::write(&key, key_pem).unwrap();
    (cert, key)
}

/// Self-signed `(cert_pem, key_pem)` for localhost.
pub fn self_signed() -> (String, String) {
    let generated = rcgen::generate_simple_self_signed(vec![
        "localhost".to_string(),
        "127.0.0.1".to_string(),
    ])
    .unwrap();
    (generated.cert.pem(), generated.key_pair.serialize_pem())
}

/// A private CA and a localhost leaf it issued.
pub struct TestPki {
    pub ca_pem: String,
    pub leaf_pem: String,
    pub leaf_key_pem: String,
}

impl TestPki {
    pub fn generate(ca_name: &str) -> Self {
        let ca_key = KeyPair::generate().unwrap();
        let mut ca_params = CertificateParams::new(Vec::<String>::new()).unwrap();
        ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
        ca_params.distinguished_name.push(DnType::CommonName, ca_name);
        let ca = ca_params.self_signed(&ca_key).unwrap();

        let leaf_key = KeyPair::generate().unwrap();
        let mut leaf_params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        leaf_params.distinguished_name.push(DnType::CommonName, "libresbc-api");
        let leaf = leaf_params.signed_by(&leaf_key, &ca, &ca_key).unwrap();

        Self {
            ca_pem: ca.pem(),
            leaf_pem: leaf.pem(),
            leaf_key_pem: leaf_key.serialize_pem(),
        }
    }
}

/// Parse `args` the way the binary does, after the program name.
pub fn cli(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("libre-webui").chain(args.iter().copied())).unwrap()
}

/// A running web UI server bound to an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub server: RunningServer,
    _bundle: TempDir,
}

impl TestServer {
    /// Start with `upstream` and any extra flags.
    pub async fn start(upstream: &str, extra: &[&str]) -> Self {
        let bundle = write_bundle();
        let webroot = bundle.path().to_str().unwrap().to_string();
        let mut args = vec!["-H", "127.0.0.1", "-P", "0", "-L", upstream, "-w", &webroot];
        args.extend_from_slice(extra);

        let config = load_config(&cli(&args)).unwrap();
        let shutdown = Shutdown::new();
        let server = launch(&config, &shutdown).await.unwrap();
        Self {
            addr: server.local_addr(),
            shutdown,
            server,
            _bundle: bundle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .unwrap()
}
