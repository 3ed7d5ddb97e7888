use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::{forecast, geocoding};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not determine platform config directory")]
    NoConfigDir,

    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Settings read from `config.toml`. Every field is optional in the file.
///
/// Example TOML:
/// ```toml
/// timeout_secs = 30
/// max_results = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Budget for a whole run: geocoding plus weather.
    pub timeout_secs: u64,

    /// Upper bound for a single HTTP request.
    pub request_timeout_secs: u64,

    pub geocoding_url: String,
    pub forecast_url: String,

    /// How many candidates to ask the geocoder for.
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            request_timeout_secs: 10,
            geocoding_url: geocoding::DEFAULT_BASE_URL.to_string(),
            forecast_url: forecast::DEFAULT_BASE_URL.to_string(),
            max_results: 10,
        }
    }
}

impl Config {
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Load config from the platform location, or defaults if there is no file yet.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config from an explicit path. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        };
        let parse_error = |source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let contents = fs::read_to_string(path).map_err(read_error)?;
        toml::from_str(&contents).map_err(parse_error)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-reporter", "weather-reporter")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
