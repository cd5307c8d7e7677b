// Application configuration

use crate::error::{BehaviorLensError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Environment variable that overrides the configured service base URL
pub const BASE_URL_ENV: &str = "BEHAVIOR_LENS_BASE_URL";

/// Default config file looked up next to the binary
pub const CONFIG_FILE: &str = "behavior_lens.toml";

/// Process-wide configuration, materialized once in `main` and passed
/// explicitly to the components that need it.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the remote analysis service
    pub base_url: String,
    /// Camera device index to try first
    pub camera_index: u32,
    /// JPEG quality (1-100) for captured frames
    pub jpeg_quality: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            camera_index: 0,
            jpeg_quality: 80,
        }
    }
}

impl Config {
    /// Loads configuration: defaults, overlaid by the TOML file when present,
    /// overlaid by the `BEHAVIOR_LENS_BASE_URL` environment variable.
    pub fn load() -> Self {
        let mut config = match Self::from_file(CONFIG_FILE) {
            Ok(Some(config)) => config,
            Ok(None) => Self::default(),
            Err(e) => {
                warn!("Failed to load {}: {}, using defaults", CONFIG_FILE, e);
                Self::default()
            }
        };
        config.apply_env_override(std::env::var(BASE_URL_ENV).ok());
        config
    }

    /// Reads the config file; `Ok(None)` when the file does not exist
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        if !path.as_ref().exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let config =
            toml::from_str(&content).map_err(|e| BehaviorLensError::Config(e.to_string()))?;
        Ok(Some(config))
    }

    /// Applies the environment override for the base URL, if set and non-empty
    pub fn apply_env_override(&mut self, value: Option<String>) {
        if let Some(url) = value {
            if !url.trim().is_empty() {
                self.base_url = url.trim().to_string();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_localhost() {
        let config = Config::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.camera_index, 0);
        assert_eq!(config.jpeg_quality, 80);
    }

    #[test]
    fn env_override_replaces_base_url() {
        let mut config = Config::default();
        config.apply_env_override(Some("https://analysis.example.com".to_string()));
        assert_eq!(config.base_url, "https://analysis.example.com");
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let mut config = Config::default();
        config.apply_env_override(Some("  ".to_string()));
        assert_eq!(config.base_url, "http://localhost:5000");
        config.apply_env_override(None);
        assert_eq!(config.base_url, "http://localhost:5000");
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(r#"base_url = "http://10.0.0.2:5000""#).unwrap();
        assert_eq!(config.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.jpeg_quality, 80);
    }
}
