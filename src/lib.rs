//! Link-prewarming reverse proxy.
//!
//! Forwards origin responses to the client byte for byte while scanning HTML
//! bodies for anchor links in flight, then warms the edge cache for every
//! discovered link in the background once the response has started streaming.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────┐
//!                  │                  PREFETCH PROXY                    │
//!                  │                                                    │
//!  Client Request  │  ┌─────────┐     ┌──────────┐   cache directive   │
//!  ────────────────┼─▶│  http   │────▶│  origin  │─────────────────────┼──▶ Origin
//!                  │  │ server  │     │ fetcher  │                     │    Server
//!                  │  └────┬────┘     └──────────┘                     │
//!                  │       │ html only                                 │
//!  Client Response │  ┌────▼─────────────┐  links   ┌──────────────┐   │
//!  ◀───────────────┼──│ extract          │─────────▶│ crawl        │───┼──▶ cache
//!   (streamed)     │  │ decode+tokenize  │ (after   │ fan-out      │   │    warming
//!                  │  └──────────────────┘  drain)  └──────────────┘   │
//!                  │                                                   │
//!                  │  cross-cutting: config · observability · lifecycle│
//!                  └───────────────────────────────────────────────────┘
//! ```
//!
//! The extractor and the client share one pass over the origin body: each
//! chunk is decoded, fed to the tokenizer, and re-emitted to the client
//! before the next chunk is read. Background cache warming runs on the
//! keep-alive tracker and outlives the client response delivery.

// Core subsystems
pub mod config;
pub mod error;
pub mod http;
pub mod origin;

// Streaming pipeline
pub mod crawl;
pub mod extract;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
