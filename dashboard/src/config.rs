//! Dashboard configuration file and environment variable handling.
//!
//! Settings come from `rushradar.toml` (all keys optional) and are then
//! overridden by `RUSHRADAR_*` environment variables:
//!
//! ```toml
//! [backend]
//! api_base_url = "http://127.0.0.1:5000"
//! request_timeout_secs = 10
//!
//! [dashboard]
//! default_horizon = "15min"
//! peak_hours = "7-10 AM & 5-8 PM"
//! theme_file = "rushradar-prefs.json"
//!
//! [map]
//! directions_base_url = "https://api.mapbox.com"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::DEFAULT_HORIZON_ID;
use crate::error::{DashboardError, DashboardResult};
use crate::presenters::stats::DEFAULT_PEAK_HOURS;

pub const CONFIG_FILE_NAME: &str = "rushradar.toml";

pub const ENV_API_URL: &str = "RUSHRADAR_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "RUSHRADAR_TIMEOUT_SECS";
pub const ENV_DEFAULT_HORIZON: &str = "RUSHRADAR_DEFAULT_HORIZON";
pub const ENV_THEME_FILE: &str = "RUSHRADAR_THEME_FILE";

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub map: MapSettings,
}

/// Prediction backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Selection and display settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_horizon")]
    pub default_horizon: String,
    #[serde(default = "default_peak_hours")]
    pub peak_hours: String,
    #[serde(default = "default_theme_file")]
    pub theme_file: PathBuf,
}

/// Map provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSettings {
    #[serde(default = "default_directions_base_url")]
    pub directions_base_url: String,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_horizon() -> String {
    DEFAULT_HORIZON_ID.to_string()
}

fn default_peak_hours() -> String {
    DEFAULT_PEAK_HOURS.to_string()
}

fn default_theme_file() -> PathBuf {
    PathBuf::from("rushradar-prefs.json")
}

fn default_directions_base_url() -> String {
    "https://api.mapbox.com".to_string()
}

fn search_paths() -> [PathBuf; 2] {
    [
        PathBuf::from(CONFIG_FILE_NAME),
        Path::new("..").join(CONFIG_FILE_NAME),
    ]
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_horizon: default_horizon(),
            peak_hours: default_peak_hours(),
            theme_file: default_theme_file(),
        }
    }
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            directions_base_url: default_directions_base_url(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns [`DashboardError::Configuration`] if the file cannot be read or
    /// parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            DashboardError::Configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: DashboardConfig = toml::from_str(&content).map_err(|e| {
            DashboardError::Configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load configuration from the first `rushradar.toml` found in the
    /// current directory or its parent.
    ///
    /// # Errors
    /// Returns [`DashboardError::Configuration`] if no file exists or it fails
    /// to parse.
    pub fn from_default_location() -> DashboardResult<Self> {
        for path in search_paths() {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(DashboardError::Configuration(format!(
            "No {} found in standard locations",
            CONFIG_FILE_NAME
        )))
    }

    /// Defaults with environment overrides applied.
    pub fn from_env() -> DashboardResult<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// File config when one is found, otherwise defaults; env overrides win
    /// in both cases.
    ///
    /// A file that exists but does not parse is an error.
    pub fn load(explicit: Option<&Path>) -> DashboardResult<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                if search_paths().iter().any(|p| p.exists()) {
                    Self::from_default_location()?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `RUSHRADAR_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> DashboardResult<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides resolved by `lookup`. Empty values are ignored.
    ///
    /// # Errors
    /// Returns [`DashboardError::Configuration`] for a timeout that is not a
    /// positive integer.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> DashboardResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.backend.api_base_url = url;
        }
        if let Some(secs) = get(ENV_TIMEOUT_SECS) {
            self.backend.request_timeout_secs = secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or_else(|| {
                    DashboardError::Configuration(format!(
                        "{} must be a positive number of seconds, got '{}'",
                        ENV_TIMEOUT_SECS, secs
                    ))
                })?;
        }
        if let Some(horizon) = get(ENV_DEFAULT_HORIZON) {
            self.dashboard.default_horizon = horizon;
        }
        if let Some(path) = get(ENV_THEME_FILE) {
            self.dashboard.theme_file = PathBuf::from(path);
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.request_timeout_secs)
    }
}
