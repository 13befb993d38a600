//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, limits > 0)
//! - Check addresses and URLs parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("listener.public_url: '{0}' is not an absolute http(s) URL")]
    InvalidPublicUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if let Some(raw) = &config.listener.public_url {
        let usable = config
            .listener
            .base_url()
            .map(|url| matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base())
            .unwrap_or(false);
        if !usable {
            errors.push(ValidationError::InvalidPublicUrl(raw.clone()));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero("timeouts.request_secs"));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn test_rejects_relative_public_url() {
        let mut config = ServerConfig::default();
        config.listener.public_url = Some("/shoppinglists".to_string());
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidPublicUrl("/shoppinglists".to_string())])
        );
    }

    #[test]
    fn test_rejects_non_http_public_url() {
        let mut config = ServerConfig::default();
        config.listener.public_url = Some("mailto:lists@example.com".to_string());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ServerConfig::default();
        config.observability.metrics_address = "bogus".to_string();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::InvalidAddress {
                field: "observability.metrics_address",
                value: "bogus".to_string(),
            }])
        );
    }
}
