//! Pre-commit failure boundary.
//!
//! Converts failures raised before the client response is committed into a
//! minimal error response. Failures after commitment never reach this
//! module: status and headers are already on the wire, so they can only
//! truncate the stream (see `extract::stream`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::ProxyError;

const FALLBACK_MESSAGE: &str = "proxy error";

/// Minimal error response: server-error status plus the failure's message.
pub fn error_response(err: &ProxyError) -> Response {
    let message = err.to_string();
    let message = if message.is_empty() {
        FALLBACK_MESSAGE.to_string()
    } else {
        message
    };
    (err.status(), message).into_response()
}
