//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from the TOML config
//! file; every section has defaults so a minimal config stays small.

use serde::{Deserialize, Serialize};

/// Root configuration for the discovery daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// HTTP server settings.
    pub server: ServerConfig,

    /// Source files and refresh behavior.
    pub provider: ProviderConfig,

    /// Logging and metrics settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:9313").
    pub bind_address: String,

    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:9313".to_string(),
            request_timeout_secs: 10,
        }
    }
}

/// Source set and refresh behavior.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Source files, in response order. The extension selects the decoder
    /// (json, yaml, yml, toml).
    pub files: Vec<String>,

    /// Force a full reload on every refresh cycle, regardless of the
    /// source's modification time.
    pub disable_modified_time_check: bool,

    /// Refresh cadence in seconds.
    pub re_eval_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            disable_modified_time_check: false,
            re_eval_secs: 30,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level when RUST_LOG is not set.
    pub log_level: String,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_parses_with_defaults() {
        let config: DiscoveryConfig = toml::from_str(
            r#"
            [provider]
            files = ["targets/prod.json"]
            "#,
        )
        .unwrap();

        assert_eq!(config.provider.files, vec!["targets/prod.json"]);
        assert!(!config.provider.disable_modified_time_check);
        assert_eq!(config.provider.re_eval_secs, 30);
        assert_eq!(config.server.bind_address, "0.0.0.0:9313");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_full_config_parses() {
        let config: DiscoveryConfig = toml::from_str(
            r#"
            [server]
            bind_address = "127.0.0.1:9000"
            request_timeout_secs = 5

            [provider]
            files = ["a.json", "b.yaml"]
            disable_modified_time_check = true
            re_eval_secs = 10

            [observability]
            log_level = "debug"
            metrics_enabled = true
            metrics_address = "127.0.0.1:9091"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.request_timeout_secs, 5);
        assert!(config.provider.disable_modified_time_check);
        assert!(config.observability.metrics_enabled);
    }
}
