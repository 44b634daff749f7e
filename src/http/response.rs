//! Response helpers.
//!
//! # Responsibilities
//! - Map upstream transport errors to gateway statuses
//! - Build method-not-allowed responses with an `Allow` header
//!
//! # Design Decisions
//! - Connect timeouts result in 504 Gateway Timeout, every other transport
//!   failure in 502 Bad Gateway
//! - Error bodies are short plain text; details go to the log, not the client

use std::error::Error as StdError;
use std::io;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

/// Status for a failed upstream call.
pub fn gateway_status(err: &(dyn StdError + 'static)) -> StatusCode {
    if is_timeout(err) {
        StatusCode::GATEWAY_TIMEOUT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Response for a failed upstream call.
pub fn gateway_error(err: &(dyn StdError + 'static)) -> Response {
    match gateway_status(err) {
        StatusCode::GATEWAY_TIMEOUT => {
            (StatusCode::GATEWAY_TIMEOUT, "Upstream request timed out").into_response()
        }
        status => (status, "Upstream request failed").into_response(),
    }
}

/// 405 listing the accepted methods.
pub fn method_not_allowed(allow: &[Method]) -> Response {
    let allow = allow
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let mut response = (StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed").into_response();
    if let Ok(value) = HeaderValue::from_str(&allow) {
        response.headers_mut().insert(header::ALLOW, value);
    }
    response
}

fn is_timeout(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(io_err) = e.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = e.source();
    }
    false
}
