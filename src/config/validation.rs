//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (limits > 0, ports valid)
//! - Check the token table for blanks and duplicates
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.port must be non-zero")]
    ZeroPort,

    #[error("http.max_body_bytes must be greater than zero")]
    ZeroBodyLimit,

    #[error("http.request_timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("http.api_prefix `{0}` must start with `/` and not be `/`")]
    BadApiPrefix(String),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    BadMetricsAddress(String),

    #[error("auth.tokens[{0}] has an empty token")]
    EmptyToken(usize),

    #[error("auth.tokens[{0}] has an empty role")]
    EmptyRole(usize),

    #[error("auth.tokens[{0}] repeats an earlier token")]
    DuplicateToken(usize),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.port == 0 {
        errors.push(ValidationError::ZeroPort);
    }

    if config.http.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }
    if config.http.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    let prefix = &config.http.api_prefix;
    if !prefix.starts_with('/') || prefix.trim_end_matches('/').is_empty() {
        errors.push(ValidationError::BadApiPrefix(prefix.clone()));
    }

    let metrics_address = &config.observability.metrics_address;
    if config.observability.metrics_enabled && metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadMetricsAddress(metrics_address.clone()));
    }

    let mut seen = HashSet::new();
    for (i, entry) in config.auth.tokens.iter().enumerate() {
        if entry.token.trim().is_empty() {
            errors.push(ValidationError::EmptyToken(i));
        } else if !seen.insert(entry.token.as_str()) {
            errors.push(ValidationError::DuplicateToken(i));
        }
        if entry.role.trim().is_empty() {
            errors.push(ValidationError::EmptyRole(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
