//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::ClientConfig;
use crate::notify::ToastTiming;
use crate::update::UpdateSettings;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Dashboard server connection
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl ApiConfig {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(self.base_url.clone())
    }
}

/// Notification and update-action settings
#[derive(Debug, Clone, Deserialize)]
pub struct UiConfig {
    #[serde(default = "default_toast_delay")]
    pub toast_delay_ms: u64,

    #[serde(default = "default_fade")]
    pub fade_ms: u64,

    #[serde(default = "default_refresh_delay")]
    pub refresh_delay_ms: u64,

    #[serde(default = "default_modal_id")]
    pub modal_id: String,

    #[serde(default = "default_status_id")]
    pub status_id: String,
}

fn default_toast_delay() -> u64 {
    5000
}

fn default_fade() -> u64 {
    150
}

fn default_refresh_delay() -> u64 {
    2000
}

fn default_modal_id() -> String {
    "updateModal".to_string()
}

fn default_status_id() -> String {
    "updateStatus".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_delay_ms: default_toast_delay(),
            fade_ms: default_fade(),
            refresh_delay_ms: default_refresh_delay(),
            modal_id: default_modal_id(),
            status_id: default_status_id(),
        }
    }
}

impl UiConfig {
    pub fn toast_timing(&self) -> ToastTiming {
        ToastTiming {
            delay: Duration::from_millis(self.toast_delay_ms),
            fade: Duration::from_millis(self.fade_ms),
        }
    }

    pub fn update_settings(&self) -> UpdateSettings {
        UpdateSettings {
            modal_id: self.modal_id.clone(),
            status_id: self.status_id.clone(),
            refresh_delay: Duration::from_millis(self.refresh_delay_ms),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment.
    ///
    /// Nothing is logged here: the subscriber is usually configured from the
    /// result, so the caller reports [`LoadedConfig::source`] and
    /// [`LoadedConfig::errors`] once logging is up.
    pub fn load_default() -> LoadedConfig {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("stockdash").join("config.toml")),
            Some(PathBuf::from("/etc/stockdash/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_from_paths(&config_paths)
    }

    /// Load the first candidate that exists and parses. Candidates that exist
    /// but fail to load are recorded and skipped.
    pub fn load_from_paths(paths: &[PathBuf]) -> LoadedConfig {
        let mut errors = Vec::new();

        for path in paths.iter().filter(|p| p.exists()) {
            match Self::load_with_env(path) {
                Ok(config) => {
                    return LoadedConfig {
                        config,
                        source: Some(path.clone()),
                        errors,
                    }
                }
                Err(e) => errors.push(e),
            }
        }

        LoadedConfig {
            config: Self::from_env(),
            source: None,
            errors,
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("STOCKDASH_API_URL") {
            self.api.base_url = url;
        }

        if let Ok(level) = std::env::var("STOCKDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("STOCKDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Result of searching the default config locations
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config came from, `None` when only defaults and the
    /// environment were used
    pub source: Option<PathBuf>,
    /// Candidate files that exist but could not be loaded
    pub errors: Vec<ConfigError>,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Stockdash Configuration
#
# Environment variables override these settings:
# - STOCKDASH_API_URL
# - STOCKDASH_LOG_LEVEL
# - STOCKDASH_LOG_FORMAT

[api]
# Dashboard server the client talks to
base_url = "http://localhost:5000"

[ui]
# How long a toast stays visible (ms)
toast_delay_ms = 5000

# Toast hide animation (ms)
fade_ms = 150

# Delay between a successful update and the page refresh (ms)
refresh_delay_ms = 2000

# Element ids used by the update action
modal_id = "updateModal"
status_id = "updateStatus"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
