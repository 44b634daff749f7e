//! Liveness probe handler.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

/// Body returned by the probe.
pub const HEALTH_BODY: &str = "OK";

/// Response for `GET /healthcheck`.
pub fn probe_response() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))],
        HEALTH_BODY,
    )
        .into_response()
}
