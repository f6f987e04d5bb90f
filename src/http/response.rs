//! Response classification.
//!
//! The proxy never rewrites a body; the only decision made about an origin
//! response is whether it is HTML worth scanning for links. Everything else
//! streams through untouched, headers and status included.

use axum::http::{header, HeaderMap};

/// Whether an origin response should go through the link extractor.
///
/// Case-insensitive substring match, so `text/html; charset=utf-8` and
/// `TEXT/HTML` both qualify. Missing or unreadable content types do not.
pub fn is_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}
