//! Origin HTTP client.
//!
//! One shared hyper client serves both the primary forward and background
//! cache-warming fetches. Every dispatch carries the cache directive; no
//! call is ever retried.

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use url::Url;

use crate::error::ProxyError;
use crate::origin::CacheDirective;

/// Client for all outbound fetches to the origin.
#[derive(Clone)]
pub struct OriginFetcher {
    client: Client<HttpConnector, Body>,
    directive: CacheDirective,
}

impl OriginFetcher {
    pub fn new(directive: CacheDirective, connect_timeout: Duration) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(connect_timeout));
        let client = Client::builder(TokioExecutor::new()).build(connector);
        Self { client, directive }
    }

    /// Dispatch a request to the origin with the cache directive attached.
    ///
    /// Resolves as soon as status and headers are available; the body
    /// streams lazily. Transport failures surface as [`ProxyError::Network`].
    pub async fn fetch(&self, mut request: Request<Body>) -> Result<Response<Incoming>, ProxyError> {
        self.directive.apply(&mut request);
        Ok(self.client.request(request).await?)
    }

    /// Issue a cache-warming fetch for `target` and discard the response.
    ///
    /// The request reuses the inbound request's method and headers so the
    /// edge caches the same response variant the client would have seen.
    /// The body is drained, not kept: the drain is what lets the edge
    /// finish storing the response.
    pub async fn warm(&self, target: &Url, template: &WarmTemplate) -> Result<StatusCode, ProxyError> {
        let mut builder = Request::builder()
            .method(template.method.clone())
            .uri(target.as_str());
        if let Some(headers) = builder.headers_mut() {
            *headers = template.headers.clone();
        }
        let request = builder.body(Body::empty())?;

        let response = self.fetch(request).await?;
        let status = response.status();
        let _ = response.into_body().collect().await;
        Ok(status)
    }
}

/// Method and headers of the inbound request, carried into background
/// warming fetches after the inbound request itself has been consumed.
#[derive(Debug, Clone)]
pub struct WarmTemplate {
    method: Method,
    headers: HeaderMap,
}

impl WarmTemplate {
    pub fn new(method: Method, mut headers: HeaderMap) -> Self {
        // Warming requests carry no body; stale framing headers from the
        // inbound request must not survive.
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::CONTENT_TYPE);
        Self { method, headers }
    }
}
