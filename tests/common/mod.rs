//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;

use file_discovery::config::ProviderConfig;

/// Two targets in cluster "xx".
pub const TARGETS_JSON: &str = r#"{
    "resources": [
        {"name": "host-1", "ip": "10.1.1.1", "port": 80, "labels": {"cluster": "xx"}},
        {"name": "host-2", "ip": "10.1.1.2", "port": 80, "labels": {"cluster": "xx"}}
    ]
}"#;

/// One target in cluster "yy", in a different syntax.
pub const TARGETS_YAML: &str = "
resources:
  - name: host-3
    ip: 10.1.1.3
    port: 8080
    labels:
      cluster: yy
";

/// Write a source file into the fixture directory and return its path as a
/// configured-path string.
pub fn write_source(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path.to_str().unwrap().to_string()
}

/// Provider config over the given source files, defaults otherwise.
pub fn provider_config(files: Vec<String>) -> ProviderConfig {
    ProviderConfig {
        files,
        ..ProviderConfig::default()
    }
}
