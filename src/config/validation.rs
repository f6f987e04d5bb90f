//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Collects every problem instead of stopping at the first one.

use std::net::SocketAddr;

use crate::config::schema::{CacheMode, ProxyConfig};

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn err(field: &str, message: impl Into<String>) -> ValidationError {
    ValidationError {
        field: field.to_string(),
        message: message.into(),
    }
}

/// Validate a configuration, returning all errors found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(err(
            "listener.bind_address",
            format!("not a valid socket address: {:?}", config.listener.bind_address),
        ));
    }

    match config.origin.scheme.as_str() {
        "http" | "https" => {}
        other => errors.push(err(
            "origin.scheme",
            format!("must be \"http\" or \"https\", got {:?}", other),
        )),
    }

    if config.origin.host.is_empty() {
        errors.push(err("origin.host", "must not be empty"));
    } else if config.origin.host.contains("://") || config.origin.host.contains('/') {
        errors.push(err(
            "origin.host",
            "must be a bare host[:port], without scheme or path",
        ));
    }

    if config.cache.mode == CacheMode::Ttl && config.cache.ttl_secs == 0 {
        errors.push(err("cache.ttl_secs", "must be greater than zero in ttl mode"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(err("timeouts.connect_secs", "must be greater than zero"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(err("timeouts.request_secs", "must be greater than zero"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(err(
            "observability.metrics_address",
            format!(
                "not a valid socket address: {:?}",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
