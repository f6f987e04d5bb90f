//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms; Prometheus scrape endpoint)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request's pipeline
//! - Metrics are cheap (atomic increments)
//! - Mid-stream failures have no status code to report, so the abort
//!   counter and the warn log are their only outlet

pub mod logging;
pub mod metrics;
