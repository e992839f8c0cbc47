//! Configuration file support for the PhysioAssist client.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/physio/config.toml`.
//! `PHYSIO_API_KEY` and `PHYSIO_BASE_URL` override the file; CLI flags
//! override both.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Production API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.physioassist.com/v1";

pub const ENV_API_KEY: &str = "PHYSIO_API_KEY";
pub const ENV_BASE_URL: &str = "PHYSIO_BASE_URL";

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

/// Remote API connection settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub api_key: Option<String>,

    /// Per-request timeout; unset means wait indefinitely
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

/// CLI presentation settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default `--limit` for listing commands
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_page_size() -> u32 {
    crate::request::DEFAULT_LIMIT
}

impl Config {
    /// Load configuration from the standard config path, then apply
    /// environment overrides
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from(".config"))
        });
        base.join("physio").join("config.toml")
    }

    /// Overlay `PHYSIO_API_KEY` / `PHYSIO_BASE_URL` when set and non-empty
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_BASE_URL).ok(),
            std::env::var(ENV_API_KEY).ok(),
        );
    }

    /// Overlay explicit values; blank strings are ignored
    pub fn apply_overrides(&mut self, base_url: Option<String>, api_key: Option<String>) {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.api.base_url = url;
        }
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
    }

    /// Reject settings the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            return Err(Error::Config("api.base_url must not be empty".into()));
        }
        if self.api.timeout_secs == Some(0) {
            return Err(Error::Config("api.timeout_secs must be greater than 0".into()));
        }
        if self.display.page_size == 0 {
            return Err(Error::Config("display.page_size must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.api_key, None);
        assert_eq!(config.api.timeout_secs, None);
        assert_eq!(config.display.page_size, 50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[api]
api_key = "secret"
timeout_secs = 15
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.api_key.as_deref(), Some("secret"));
        assert_eq!(config.api.timeout_secs, Some(15));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL); // default
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"http://localhost:8080/v1\"\n\n[display]\npage_size = 10\n",
        )
        .unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.api.base_url, "http://localhost:8080/v1");
        assert_eq!(loaded.display.page_size, 10);
    }

    #[test]
    fn test_load_from_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = Config::load_from(&temp_dir.path().join("absent.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_overrides_ignore_blank_values() {
        let mut config = Config::default();
        config.api.api_key = Some("from-file".into());

        config.apply_overrides(Some("  ".into()), Some(String::new()));
        assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api.api_key.as_deref(), Some("from-file"));

        config.apply_overrides(Some("http://staging/v1".into()), Some("from-flag".into()));
        assert_eq!(config.api.base_url, "http://staging/v1");
        assert_eq!(config.api.api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = Some(0);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }
}
