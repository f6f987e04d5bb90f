//! Error taxonomy for the proxy pipeline.
//!
//! Failures split into two stages. Anything raised before the client
//! response is committed (origin dispatch, URI rewriting) is caught by the
//! error responder in `http::error` and turned into a status code. Failures
//! after commitment (body read, decode, client write) can only truncate the
//! stream; they are logged by the task driving the extractor.

use axum::http::StatusCode;

use crate::extract::decoder::DecodeError;

/// Failures that can surface while proxying a single request.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Transport-level failure dispatching a fetch to the origin
    /// (DNS, connect, TLS, timeout). Never retried.
    #[error("origin request failed: {0}")]
    Network(#[from] hyper_util::client::legacy::Error),

    /// The origin body stream failed mid-read.
    #[error("origin body read failed: {0}")]
    Read(#[from] hyper::Error),

    /// The incremental decoder hit an invalid byte sequence.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The client went away before the response body was fully written.
    #[error("client disconnected before the response was fully written")]
    Write,

    /// The configured origin could not be parsed into a fetch target.
    #[error("invalid origin target: {0}")]
    Origin(String),

    /// The inbound URI could not be rewritten onto the origin authority.
    #[error("could not build origin request uri: {0}")]
    Uri(#[from] axum::http::uri::InvalidUriParts),

    /// The rewritten origin request failed to assemble.
    #[error("could not build origin request: {0}")]
    Request(#[from] axum::http::Error),
}

impl ProxyError {
    /// Status code for the minimal error response, when the failure happens
    /// before the response is committed.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Network(_) | ProxyError::Read(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            ProxyError::Network(_) => "network",
            ProxyError::Read(_) => "read",
            ProxyError::Decode(_) => "decode",
            ProxyError::Write => "write",
            ProxyError::Origin(_) => "origin",
            ProxyError::Uri(_) => "uri",
            ProxyError::Request(_) => "request",
        }
    }
}
