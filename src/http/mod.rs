//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! inbound connection
//!     → server.rs (Axum setup, middleware, proxy handler)
//!     → request.rs (request ID assignment)
//!     → origin fetch, then either:
//!         response.rs passthrough (non-HTML)
//!         or extract + crawl pipeline (HTML)
//!     → error.rs (pre-commit failure boundary)
//! ```

pub mod error;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestId, RequestIdExt, RequestIdLayer, X_REQUEST_ID};
pub use server::HttpServer;
