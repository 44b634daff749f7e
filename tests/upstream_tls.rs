//! Forwarding to an HTTPS upstream under both transport policies.

use reqwest::StatusCode;
use serde_json::Value;

mod common;

use common::{TestPki, TestServer};

#[tokio::test]
async fn self_signed_upstream_reachable_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let (cert, key) = common::self_signed();
    let upstream = common::start_tls_echo_upstream(dir.path(), &cert, &key);

    let server = TestServer::start(&format!("https://{upstream}"), &[]).await;
    let res = common::client()
        .get(server.url("/libreapi/base?scope=all"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["path"], "/libreapi/base");
    assert_eq!(echo["query"], "scope=all");
}

#[tokio::test]
async fn strict_policy_rejects_unknown_issuer() {
    let dir = tempfile::tempdir().unwrap();
    let served = TestPki::generate("LibreSBC Lab CA");
    let unrelated = TestPki::generate("Unrelated CA");
    let upstream = common::start_tls_echo_upstream(dir.path(), &served.leaf_pem, &served.leaf_key_pem);

    let ca = dir.path().join("unrelated-ca.pem");
    std::fs::write(&ca, &unrelated.ca_pem).unwrap();

    let server = TestServer::start(
        &format!("https://localhost:{}", upstream.port()),
        &["--upstream-ca", ca.to_str().unwrap()],
    )
    .await;

    let res = common::client()
        .get(server.url("/openapi.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn strict_policy_accepts_configured_ca() {
    let dir = tempfile::tempdir().unwrap();
    let pki = TestPki::generate("LibreSBC Lab CA");
    let upstream = common::start_tls_echo_upstream(dir.path(), &pki.leaf_pem, &pki.leaf_key_pem);

    let ca = dir.path().join("lab-ca.pem");
    std::fs::write(&ca, &pki.ca_pem).unwrap();

    let server = TestServer::start(
        &format!("https://localhost:{}", upstream.port()),
        &["--upstream-ca", ca.to_str().unwrap()],
    )
    .await;

    let res = common::client()
        .put(server.url("/libreapi/class/media/g711"))
        .body("codecs=PCMA,PCMU")
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    let echo: Value = res.json().await.unwrap();
    assert_eq!(echo["method"], "PUT");
    assert_eq!(echo["body"], "codecs=PCMA,PCMU");
}
