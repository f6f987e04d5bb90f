//! Background crawler: one hop of cache warming per response.
//!
//! Takes the final link list from the extractor, resolves each href against
//! the response's origin, and issues one cache-warming fetch per link,
//! all concurrently. Each task settles on its own; a failed link never
//! cancels its siblings, and nothing is retried or deduplicated.

use std::sync::Arc;

use axum::http::StatusCode;
use tokio::task::JoinSet;
use url::Url;

use crate::error::ProxyError;
use crate::observability::metrics;
use crate::origin::{OriginFetcher, WarmTemplate};

/// One discovered href paired with the origin it was discovered on.
/// Consumed by exactly one warming fetch.
#[derive(Debug, Clone)]
pub struct CrawlTask {
    pub href: String,
    pub origin: Url,
}

/// Why a single warming task failed. Isolated, never escalated.
#[derive(Debug, thiserror::Error)]
pub enum CrawlTaskError {
    #[error("unresolvable href: {0}")]
    Resolve(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}")]
    Scheme(String),

    #[error(transparent)]
    Fetch(#[from] ProxyError),
}

impl CrawlTask {
    /// Resolve the href to an absolute URL. Relative hrefs resolve against
    /// the origin; absolute ones pass through. Non-HTTP schemes (mailto:,
    /// javascript:) are not warmable.
    pub fn resolve(&self) -> Result<Url, CrawlTaskError> {
        let url = self.origin.join(&self.href)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(CrawlTaskError::Scheme(other.to_string())),
        }
    }
}

/// Fan-out warming of every link discovered on one response.
#[derive(Clone)]
pub struct BackgroundCrawler {
    fetcher: OriginFetcher,
}

impl BackgroundCrawler {
    pub fn new(fetcher: OriginFetcher) -> Self {
        Self { fetcher }
    }

    /// Warm the cache for every discovered link, concurrently, and return
    /// once all fetches have settled. Failures are logged and swallowed.
    pub async fn warm_links(&self, origin: Url, links: Vec<String>, template: WarmTemplate) {
        if links.is_empty() {
            return;
        }
        let total = links.len();
        let template = Arc::new(template);

        let mut tasks: JoinSet<Result<StatusCode, CrawlTaskError>> = JoinSet::new();
        for href in links {
            let task = CrawlTask {
                href,
                origin: origin.clone(),
            };
            let fetcher = self.fetcher.clone();
            let template = template.clone();
            tasks.spawn(async move {
                let target = task.resolve()?;
                tracing::debug!(url = %target, "warming cache");
                Ok(fetcher.warm(&target, &template).await?)
            });
        }

        let mut warmed = 0usize;
        let mut failed = 0usize;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(status)) if status.is_success() => {
                    warmed += 1;
                    metrics::record_warm_fetch("ok");
                }
                Ok(Ok(status)) => {
                    failed += 1;
                    metrics::record_warm_fetch("http_error");
                    tracing::debug!(status = %status, "cache warming fetch returned an error status");
                }
                Ok(Err(err)) => {
                    failed += 1;
                    metrics::record_warm_fetch("error");
                    tracing::debug!(error = %err, "cache warming fetch failed");
                }
                Err(err) => {
                    failed += 1;
                    metrics::record_warm_fetch("error");
                    tracing::debug!(error = %err, "cache warming task panicked");
                }
            }
        }

        tracing::debug!(total, warmed, failed, "cache warming complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(href: &str) -> CrawlTask {
        CrawlTask {
            href: href.to_string(),
            origin: Url::parse("https://example.com/").unwrap(),
        }
    }

    #[test]
    fn relative_href_resolves_against_origin() {
        assert_eq!(
            task("/about").resolve().unwrap().as_str(),
            "https://example.com/about"
        );
    }

    #[test]
    fn bare_relative_href_resolves_against_origin_root() {
        assert_eq!(
            task("news?page=2").resolve().unwrap().as_str(),
            "https://example.com/news?page=2"
        );
    }

    #[test]
    fn absolute_href_passes_through() {
        assert_eq!(
            task("http://cdn.example.net/a.html").resolve().unwrap().as_str(),
            "http://cdn.example.net/a.html"
        );
    }

    #[test]
    fn non_http_schemes_are_rejected() {
        assert!(matches!(
            task("mailto:hi@example.com").resolve(),
            Err(CrawlTaskError::Scheme(_))
        ));
        assert!(matches!(
            task("javascript:void(0)").resolve(),
            Err(CrawlTaskError::Scheme(_))
        ));
    }
}
