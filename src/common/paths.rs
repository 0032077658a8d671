use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Centralized path management for manjaro-hello
/// This module provides a single source of truth for all application paths

pub const APP_NAME: &str = "manjaro-hello";

/// Every location the welcome app reads from or writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// JSON preferences file in the user's config directory
    pub preferences: PathBuf,
    /// Symlink that makes the session start the app at login
    pub autostart_entry: PathBuf,
    /// Desktop entry shipped with the app, target of the autostart symlink
    pub desktop_entry: PathBuf,
    /// Root of the localized page tree (`pages/<locale>/<page>`)
    pub pages_dir: PathBuf,
    /// Declarative window definition
    pub layout: PathBuf,
}

impl AppPaths {
    /// Resolve paths against the user's config directory and the given data directory.
    pub fn resolve(data_dir: Option<&Path>) -> Result<Self> {
        let config_dir =
            dirs::config_dir().context("Unable to determine user config directory")?;

        let data_dir = match data_dir {
            Some(dir) => dir.to_path_buf(),
            None => std::env::current_dir().context("Unable to determine working directory")?,
        };

        Ok(Self::with_roots(&config_dir, &data_dir))
    }

    /// Build the path set from explicit roots.
    pub fn with_roots(config_dir: &Path, data_dir: &Path) -> Self {
        Self {
            preferences: config_dir.join(format!("{APP_NAME}.json")),
            autostart_entry: config_dir
                .join("autostart")
                .join(format!("{APP_NAME}.desktop")),
            desktop_entry: data_dir.join(format!("{APP_NAME}.desktop")),
            pages_dir: data_dir.join("pages"),
            layout: data_dir.join(format!("{APP_NAME}.toml")),
        }
    }
}
