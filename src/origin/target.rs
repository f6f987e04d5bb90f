//! Origin target resolution and URI rewriting.

use std::str::FromStr;

use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::Uri;
use url::Url;

use crate::config::OriginConfig;
use crate::error::ProxyError;

/// The configured origin, pre-parsed into the pieces needed to rewrite
/// inbound URIs and to resolve discovered hrefs.
#[derive(Debug, Clone)]
pub struct OriginTarget {
    scheme: Scheme,
    authority: Authority,
    /// `<scheme>://<host>/`, the base for resolving relative hrefs.
    base: Url,
}

impl OriginTarget {
    pub fn new(config: &OriginConfig) -> Result<Self, ProxyError> {
        let scheme = Scheme::from_str(&config.scheme)
            .map_err(|e| ProxyError::Origin(format!("scheme {:?}: {}", config.scheme, e)))?;
        let authority = Authority::from_str(&config.host)
            .map_err(|e| ProxyError::Origin(format!("host {:?}: {}", config.host, e)))?;
        let base = Url::parse(&format!("{}://{}/", config.scheme, config.host))
            .map_err(|e| ProxyError::Origin(format!("{:?}: {}", config.host, e)))?;
        Ok(Self {
            scheme,
            authority,
            base,
        })
    }

    /// Rewrite an inbound URI onto the origin, keeping path and query.
    pub fn rewrite(&self, uri: &Uri) -> Result<Uri, ProxyError> {
        let mut parts = uri.clone().into_parts();
        parts.scheme = Some(self.scheme.clone());
        parts.authority = Some(self.authority.clone());
        if parts.path_and_query.is_none() {
            parts.path_and_query = Some(PathAndQuery::from_static("/"));
        }
        Ok(Uri::from_parts(parts)?)
    }

    /// Protocol + host of the origin, for resolving discovered links.
    pub fn base(&self) -> &Url {
        &self.base
    }
}
