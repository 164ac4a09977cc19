use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Default sidecar HTTP endpoint
pub const DEFAULT_HTTP_ENDPOINT: &str = "http://127.0.0.1:3500";

/// Default request timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Connection settings for the sidecar HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SidecarConfig {
    pub http_endpoint: String,
    pub api_token: Option<String>,
    pub timeout_ms: u64,
}

impl Default for SidecarConfig {
    fn default() -> Self {
        Self {
            http_endpoint: DEFAULT_HTTP_ENDPOINT.to_string(),
            api_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }
}

impl SidecarConfig {
    /// Defaults with environment variable overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration from a file, then apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::load_from_file(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading sidecar config from {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.http_endpoint = normalize_endpoint(&config.http_endpoint);

        Ok(config)
    }

    /// Use a different endpoint, e.g. one given on the command line
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.http_endpoint = normalize_endpoint(endpoint);
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Apply environment variable overrides
    ///
    /// `DAPR_HTTP_ENDPOINT` takes precedence over `DAPR_HTTP_PORT`.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(endpoint) = lookup("DAPR_HTTP_ENDPOINT").filter(|e| !e.is_empty()) {
            self.http_endpoint = normalize_endpoint(&endpoint);
        } else if let Some(port) = lookup("DAPR_HTTP_PORT") {
            match port.parse::<u16>() {
                Ok(port) => self.http_endpoint = format!("http://127.0.0.1:{}", port),
                Err(_) => warn!("Ignoring invalid DAPR_HTTP_PORT value: {}", port),
            }
        }

        if let Some(token) = lookup("DAPR_API_TOKEN").filter(|t| !t.is_empty()) {
            self.api_token = Some(token);
        }
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SidecarConfig::default();
        assert_eq!(config.http_endpoint, "http://127.0.0.1:3500");
        assert_eq!(config.api_token, None);
        assert_eq!(config.timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_port_override() {
        let mut config = SidecarConfig::default();
        config.apply_overrides(lookup_from(&[("DAPR_HTTP_PORT", "3600")]));
        assert_eq!(config.http_endpoint, "http://127.0.0.1:3600");
    }

    #[test]
    fn test_endpoint_wins_over_port() {
        let mut config = SidecarConfig::default();
        config.apply_overrides(lookup_from(&[
            ("DAPR_HTTP_PORT", "3600"),
            ("DAPR_HTTP_ENDPOINT", "http://sidecar:3500/"),
            ("DAPR_API_TOKEN", "secret"),
        ]));
        assert_eq!(config.http_endpoint, "http://sidecar:3500");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_invalid_port_is_ignored() {
        let mut config = SidecarConfig::default();
        config.apply_overrides(lookup_from(&[("DAPR_HTTP_PORT", "not-a-port")]));
        assert_eq!(config.http_endpoint, DEFAULT_HTTP_ENDPOINT);
    }

    #[test]
    fn test_load_from_file_with_partial_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sidecar.toml");
        std::fs::write(&path, "http_endpoint = \"http://localhost:3501/\"\n").unwrap();

        let config = SidecarConfig::load_from_file(&path).unwrap();
        assert_eq!(config.http_endpoint, "http://localhost:3501");
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(SidecarConfig::load_from_file(dir.path().join("missing.toml")).is_err());
    }
}
