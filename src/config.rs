//! Application configuration - API endpoint and remembered sign-in email.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "greenride-ops";
const CONFIG_FILE: &str = "config.json";

const DEFAULT_API_BASE_URL: &str = "https://api.greenride.app";
const API_URL_ENV: &str = "GREENRIDE_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the GreenRide platform API.
    #[serde(default)]
    pub api_base_url: Option<String>,
    /// Email remembered from the last successful sign-in.
    #[serde(default)]
    pub last_email: Option<String>,
}

impl Config {
    /// Load the config file; a missing file means defaults.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Could not read config at {}", path.display()))
            }
        };
        serde_json::from_str(&contents)
            .with_context(|| format!("Config at {} is not valid JSON", path.display()))
    }

    /// Write the config file, creating its directory on first save.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Could not create {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self).context("Could not serialize config")?;
        fs::write(&path, contents)
            .with_context(|| format!("Could not write config to {}", path.display()))
    }

    fn config_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("No config directory on this platform")?;
        Ok(dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the API base URL: environment wins, then config, then default.
    pub fn api_url(&self) -> String {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.is_empty() {
                return url;
            }
        }
        self.api_base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
    }

    /// Directory for session state and logs, if the platform has one.
    /// Callers fall back to in-memory state when it does not.
    pub fn data_dir(&self) -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_prefers_configured_value() {
        std::env::remove_var(API_URL_ENV);
        let config = Config {
            api_base_url: Some("https://staging.greenride.app".to_string()),
            last_email: None,
        };
        assert_eq!(config.api_url(), "https://staging.greenride.app");
    }

    #[test]
    fn test_api_url_defaults_to_production() {
        std::env::remove_var(API_URL_ENV);
        let config = Config::default();
        assert_eq!(config.api_url(), DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_config_roundtrips_through_json() {
        let config = Config {
            api_base_url: None,
            last_email: Some("dana@greenride.app".to_string()),
        };
        let json = serde_json::to_string(&config).expect("serialize config");
        let restored: Config = serde_json::from_str(&json).expect("parse config");
        assert_eq!(restored.last_email.as_deref(), Some("dana@greenride.app"));
        assert!(restored.api_base_url.is_none());
    }
}
