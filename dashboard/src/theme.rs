//! Persisted light/dark theme preference.
//!
//! The preference lives under a single key in a small JSON key/value file, so
//! other client-side settings can share the file later. A missing or
//! unreadable file means the default dark theme.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{DashboardError, DashboardResult};

/// Storage key for the preference.
pub const THEME_KEY: &str = "rushradar_theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Glyph on the toggle button: the theme you would switch to.
    pub fn toggle_glyph(&self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            _ => Err(format!("Unknown theme: {}", s)),
        }
    }
}

/// File-backed theme preference.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
}

impl ThemeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable preferences file {}: {}", self.path.display(), e);
            BTreeMap::new()
        })
    }

    /// Stored theme, or [`Theme::Dark`] when nothing valid is stored.
    pub fn load(&self) -> Theme {
        self.read_entries()
            .get(THEME_KEY)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Persist `theme`, keeping any other keys in the file.
    pub fn save(&self, theme: Theme) -> DashboardResult<()> {
        let mut entries = self.read_entries();
        entries.insert(THEME_KEY.to_string(), theme.as_str().to_string());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    DashboardError::ThemeStorage(format!(
                        "Failed to create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| DashboardError::ThemeStorage(e.to_string()))?;
        fs::write(&self.path, content).map_err(|e| {
            DashboardError::ThemeStorage(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!(theme = %theme, "Theme saved");
        Ok(())
    }

    /// Flip the stored theme and return the new value.
    pub fn toggle(&self) -> DashboardResult<Theme> {
        let next = self.load().toggled();
        self.save(next)?;
        Ok(next)
    }
}
