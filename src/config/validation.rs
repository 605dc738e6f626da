//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every source file has a decodable extension
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the parsed config
//! - Runs before the config is accepted into the system

use std::collections::HashSet;
use std::fmt;
use std::net::SocketAddr;
use std::path::Path;

use crate::config::schema::DiscoveryConfig;
use crate::discovery::decoder;

/// A single semantic problem in the configuration.
#[derive(Debug)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &DiscoveryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut push = |field: &str, message: String| {
        errors.push(ValidationError {
            field: field.to_string(),
            message,
        });
    };

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        push(
            "server.bind_address",
            format!("not a socket address: {:?}", config.server.bind_address),
        );
    }
    if config.server.request_timeout_secs == 0 {
        push("server.request_timeout_secs", "must be positive".to_string());
    }

    if config.provider.files.is_empty() {
        push("provider.files", "at least one source file is required".to_string());
    }
    let mut seen = HashSet::new();
    for file in &config.provider.files {
        if !decoder::is_supported(Path::new(file)) {
            push(
                "provider.files",
                format!("unsupported source format: {file:?}"),
            );
        }
        if !seen.insert(file) {
            push("provider.files", format!("duplicate source path: {file:?}"));
        }
    }
    if config.provider.re_eval_secs == 0 {
        push("provider.re_eval_secs", "must be positive".to_string());
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        push(
            "observability.metrics_address",
            format!(
                "not a socket address: {:?}",
                config.observability.metrics_address
            ),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
