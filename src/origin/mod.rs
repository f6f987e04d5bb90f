//! Outbound fetch path to the origin server.
//!
//! # Data Flow
//! ```text
//! inbound request parts
//!     → target.rs (rewrite scheme + authority onto the origin)
//!     → directive.rs (attach the edge cache hint, out of band)
//!     → fetcher.rs (dispatch via the shared hyper client)
//! ```
//!
//! The same fetcher serves the primary forward and every background
//! cache-warming request, with the same cache directive on each.

pub mod directive;
pub mod fetcher;
pub mod target;

pub use directive::CacheDirective;
pub use fetcher::{OriginFetcher, WarmTemplate};
pub use target::OriginTarget;
