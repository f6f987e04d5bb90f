//! HTTP server setup and the proxy pipeline.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all proxy handler
//! - Wire up middleware (tracing, timeout, request ID)
//! - Forward requests to the origin with the cache directive attached
//! - Hand HTML bodies to the streaming link extractor
//! - Schedule background cache warming on the keep-alive tracker
//! - Convert pre-commit failures into error responses

use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use bytes::Bytes;
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tokio_stream::wrappers::ReceiverStream;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ProxyConfig;
use crate::crawl::{BackgroundCrawler, KeepAlive};
use crate::error::ProxyError;
use crate::extract::StreamingLinkExtractor;
use crate::http::error::error_response;
use crate::http::request::{RequestIdExt, RequestIdLayer};
use crate::http::response::is_html;
use crate::observability::metrics;
use crate::origin::{OriginFetcher, OriginTarget, WarmTemplate};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub fetcher: OriginFetcher,
    pub crawler: BackgroundCrawler,
    pub keepalive: KeepAlive,
    pub origin: OriginTarget,
}

/// HTTP server for the prefetch proxy.
pub struct HttpServer {
    router: Router,
    config: ProxyConfig,
    keepalive: KeepAlive,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ProxyConfig) -> Result<Self, ProxyError> {
        let origin = OriginTarget::new(&config.origin)?;
        let fetcher = OriginFetcher::new(
            config.cache.directive(),
            Duration::from_secs(config.timeouts.connect_secs),
        );
        let crawler = BackgroundCrawler::new(fetcher.clone());
        let keepalive = KeepAlive::new();

        let state = AppState {
            fetcher,
            crawler,
            keepalive: keepalive.clone(),
            origin,
        };

        let router = Self::build_router(&config, state);
        Ok(Self {
            router,
            config,
            keepalive,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// The keep-alive tracker carrying background cache warming.
    pub fn keepalive(&self) -> KeepAlive {
        self.keepalive.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Run the server until `shutdown` fires, then drain background work.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            origin = %self.config.origin.host,
            "HTTP server starting"
        );

        let app = self.router.into_make_service();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        // Responses are done, but their crawls may not be. This wait is the
        // keep-alive guarantee.
        tracing::info!("HTTP server stopped; draining background cache warming");
        self.keepalive.drain().await;
        tracing::info!("background cache warming drained");
        Ok(())
    }
}

/// Main proxy handler. Forwards to the origin and, for HTML responses,
/// splices in the streaming link extractor.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "proxying request"
    );

    let response = match forward(&state, request, &request_id).await {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                error = %err,
                "request failed before response commit"
            );
            error_response(&err)
        }
    };

    metrics::record_request(&method, response.status().as_u16(), start);
    response
}

/// Everything up to the point where the client response is committed.
/// Failures in here still have a say in the status code.
async fn forward(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();

    // Rewrite the URI onto the origin; the authority then comes from the
    // URI, not from the inbound Host header.
    let target = state.origin.rewrite(&parts.uri)?;
    let mut headers = parts.headers;
    headers.remove(header::HOST);

    // Method and headers survive for background warming after the inbound
    // request itself is consumed by the forward.
    let template = WarmTemplate::new(parts.method.clone(), headers.clone());

    let mut builder = Request::builder().method(parts.method).uri(target);
    if let Some(outbound_headers) = builder.headers_mut() {
        *outbound_headers = headers;
    }
    let origin_request = builder.body(body)?;

    // Resolves once status and headers are in; the body is still streaming.
    let origin_response = state.fetcher.fetch(origin_request).await?;
    let (parts, body) = origin_response.into_parts();

    if !is_html(&parts.headers) {
        // Plain proxying: hand the origin body through untouched.
        return Ok(Response::from_parts(parts, Body::new(body)).into_response());
    }

    // Capacity 1: the extractor cannot run ahead of the client.
    let (tx, rx) = mpsc::channel::<Result<Bytes, std::io::Error>>(1);

    let crawler = state.crawler.clone();
    let origin_base = state.origin.base().clone();
    let request_id = request_id.to_string();
    state.keepalive.spawn(async move {
        match StreamingLinkExtractor::new().run(body, tx).await {
            Ok(links) => {
                metrics::record_links_discovered(links.len());
                tracing::debug!(
                    request_id = %request_id,
                    links = links.len(),
                    "link extraction complete"
                );
                crawler.warm_links(origin_base, links, template).await;
            }
            Err(err) => {
                // Status and headers are committed; the client sees a
                // truncated body and this log line is the error channel.
                metrics::record_stream_abort(err.kind());
                tracing::warn!(
                    request_id = %request_id,
                    error = %err,
                    "response stream aborted mid-flight, body truncated"
                );
            }
        }
    });

    // Committed from here on: status/headers go out while the extractor is
    // still feeding the body.
    Ok(Response::from_parts(parts, Body::from_stream(ReceiverStream::new(rx))).into_response())
}
