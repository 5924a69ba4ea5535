//! Configuration validation.
//!
//! Semantic checks on top of serde's syntactic parsing. Validation is a
//! pure function over the config and reports every problem found, not just
//! the first.

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "chain.rpc_url").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
///
/// Returns all errors found so an operator can fix a config file in one
/// pass.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("'{}' is not a valid socket address", config.listener.bind_address),
        });
    }

    if config.chain.rpc_url.parse::<url::Url>().is_err() {
        errors.push(ValidationError {
            field: "chain.rpc_url".to_string(),
            message: format!("'{}' is not a valid URL", config.chain.rpc_url),
        });
    }
    for (i, failover) in config.chain.failover_urls.iter().enumerate() {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: format!("chain.failover_urls[{}]", i),
                message: format!("'{}' is not a valid URL", failover),
            });
        }
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "chain.rpc_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if let Some(base_url) = &config.properties.base_url {
        if base_url.parse::<url::Url>().is_err() {
            errors.push(ValidationError {
                field: "properties.base_url".to_string(),
                message: format!("'{}' is not a valid URL", base_url),
            });
        }
    }
    if config.properties.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "properties.request_timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError {
            field: "observability.metrics_address".to_string(),
            message: format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
