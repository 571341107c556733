//! Configuration module
//!
//! TOML file at `~/.config/tracking-console/config.toml` by default; every
//! section is optional and falls back to its defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::shared::ConsoleError;

/// Overrides `api.base_url`
pub const API_URL_ENV: &str = "TRACKING_API_URL";
/// Overrides the config file location
pub const CONFIG_PATH_ENV: &str = "TRACKING_CONSOLE_CONFIG";

const APP_DIR: &str = "tracking-console";
const DEFAULT_BASE_URL: &str = "http://localhost:5047";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Backend origin, without a trailing slash
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Where the bearer token is kept between runs
    pub token_file: PathBuf,
    /// `false` keeps the token in memory for the current process only
    pub persist: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: config_dir().join("token"),
            persist: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

fn config_dir() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

/// `~/.config/tracking-console/config.toml` (platform config dir)
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

impl AppConfig {
    /// Read the file at `path`; a missing file yields the defaults.
    /// `TRACKING_API_URL` wins over the file's `api.base_url`.
    pub fn load(path: &Path) -> Result<Self, ConsoleError> {
        let mut config = match fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConsoleError> {
        toml::from_str(text).map_err(|e| ConsoleError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String, ConsoleError> {
        toml::to_string_pretty(self).map_err(|e| ConsoleError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> Result<(), ConsoleError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                self.api.base_url = url.to_string();
            }
        }
    }
}
