//! Edge cache directive.
//!
//! The directive is a hint to the edge cache sitting on the outbound path,
//! attached to each fetch as a request *extension* rather than an HTTP
//! header: it is meant for the transport layer, never for the origin.
//! This crate only produces the directive; storage and eviction belong to
//! the edge.

use axum::body::Body;
use axum::http::Request;

/// Hint attached to every outbound fetch requesting that the response be
/// stored in the edge cache.
///
/// The same directive is applied uniformly to the primary forward and to
/// all background cache-warming fetches. Known limitation: if the origin
/// varies responses per requester (sessions, cookies) and the directive is
/// coarse, one user's content can be cached and served to others. That risk
/// is accepted here; pick `Everything` (header-respecting) over `Ttl`
/// (header-ignoring) when in doubt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheDirective {
    /// Cache the response if its own cache-control semantics allow it.
    Everything,
    /// Cache the response for a fixed number of seconds regardless of its
    /// headers. Riskier; see the variance note above.
    Ttl(u64),
}

impl CacheDirective {
    /// Attach this directive to an outbound request.
    pub fn apply(self, request: &mut Request<Body>) {
        request.extensions_mut().insert(self);
    }
}
