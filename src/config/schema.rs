//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::origin::CacheDirective;

/// Root configuration for the prefetch proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Origin server all requests are forwarded to.
    pub origin: OriginConfig,

    /// Edge cache directive attached to every outbound fetch.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Origin server configuration.
///
/// Inbound requests keep their path, query, method, headers and body; only
/// the scheme and authority are rewritten to this target.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OriginConfig {
    /// Scheme used to reach the origin ("http" or "https").
    pub scheme: String,

    /// Origin host, optionally with a port (e.g., "example.com" or
    /// "127.0.0.1:3000").
    pub host: String,
}

impl Default for OriginConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            host: "example.com".to_string(),
        }
    }
}

/// Edge cache directive configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Caching mode requested from the edge.
    pub mode: CacheMode,

    /// TTL in seconds, used only when `mode = "ttl"`.
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::Everything,
            ttl_secs: 120,
        }
    }
}

impl CacheConfig {
    /// The directive attached to every outbound fetch.
    pub fn directive(&self) -> CacheDirective {
        match self.mode {
            CacheMode::Everything => CacheDirective::Everything,
            CacheMode::Ttl => CacheDirective::Ttl(self.ttl_secs),
        }
    }
}

/// How aggressively the edge should cache origin responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheMode {
    /// Cache whenever the response's own caching headers allow it.
    Everything,
    /// Cache for a fixed TTL regardless of response headers.
    Ttl,
}

/// Timeout configuration for outbound fetches.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the origin to produce response headers, per
    /// inbound request. Body streaming is not bounded by this.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
