//! Runtime configuration of the placement engine.
//!
//! Read from an optional TOML file; the API base URL can additionally be
//! overridden through `AR_PLACEMENT_API_BASE_URL` or the command line.

use std::path::{Path, PathBuf};

use bevy_log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use constants::api::{API_BASE_URL_ENV, DEFAULT_API_HOST, DEFAULT_API_PORT};

use crate::persistence::resolve_api_base_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Explicit base URL; takes precedence over `host` and `port`.
    pub base_url: Option<String>,
    pub host: String,
    pub port: u16,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: None,
            host: DEFAULT_API_HOST.to_string(),
            port: DEFAULT_API_PORT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub api: ApiSettings,
}

impl PlacementConfig {
    /// Defaults when `path` is `None`, then the environment override.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                info!("Loaded configuration from {:?}", path);
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        Ok(config.with_base_url_override(std::env::var(API_BASE_URL_ENV).ok()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Replace the base URL when `value` is non-blank.
    pub fn with_base_url_override(mut self, value: Option<String>) -> Self {
        if let Some(value) = value.filter(|value| !value.trim().is_empty()) {
            self.api.base_url = Some(value);
        }
        self
    }

    pub fn api_base_url(&self) -> String {
        resolve_api_base_url(self.api.base_url.as_deref(), &self.api.host, self.api.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_point_at_local_api() {
        let config = PlacementConfig::default();
        assert_eq!(config.api_base_url(), "http://localhost:5000");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = PlacementConfig::from_toml_str("[api]\nhost = \"10.0.0.4\"\n").unwrap();
        assert_eq!(config.api.port, DEFAULT_API_PORT);
        assert_eq!(config.api_base_url(), "http://10.0.0.4:5000");
    }

    #[test]
    fn override_wins_over_file() {
        let config = PlacementConfig::from_toml_str("[api]\nbase_url = \"http://a:1\"\n")
            .unwrap()
            .with_base_url_override(Some("https://b.example".to_string()));
        assert_eq!(config.api_base_url(), "https://b.example");
    }

    #[test]
    fn blank_override_is_ignored() {
        let config = PlacementConfig::default().with_base_url_override(Some(" ".to_string()));
        assert_eq!(config.api.base_url, None);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = 8080").unwrap();

        let config = PlacementConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api.port, 8080);
    }

    #[test]
    fn invalid_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[api]\nport = \"not a port\"").unwrap();

        let err = PlacementConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = PlacementConfig::load(Some(Path::new("/nonexistent/placement.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
