//! Background cache warming.
//!
//! # Data Flow
//! ```text
//! discovered hrefs (after extraction drains)
//!     → crawler.rs (resolve against the origin, fan out warming fetches)
//!     → keepalive.rs (lets the fan-out outlive the client response)
//! ```
//!
//! Everything here is best effort: per-link failures are logged and
//! swallowed, never surfaced to the client.

pub mod crawler;
pub mod keepalive;

pub use crawler::{BackgroundCrawler, CrawlTask, CrawlTaskError};
pub use keepalive::KeepAlive;
