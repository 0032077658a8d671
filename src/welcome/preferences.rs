//! Persistent user preferences for the welcome app

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::ui::prelude::*;

/// Contents of the preferences file.
///
/// Keys this version does not know about are kept and written back unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub autostart: bool,
    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl Preferences {
    pub fn new(autostart: bool) -> Self {
        Self {
            autostart,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Error, Debug)]
pub enum PreferencesError {
    #[error("Preferences file {0} does not exist")]
    NotFound(PathBuf),

    #[error("Permission denied accessing {0}")]
    PermissionDenied(PathBuf),

    #[error("Preferences file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PreferencesError {
    fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Read the preferences file at `path`.
pub fn load(path: &Path) -> Result<Preferences, PreferencesError> {
    let contents = fs::read_to_string(path).map_err(|e| PreferencesError::from_io(path, e))?;

    serde_json::from_str(&contents).map_err(|source| PreferencesError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Overwrite the preferences file at `path`, creating its directory if needed.
pub fn save(path: &Path, preferences: &Preferences) -> Result<(), PreferencesError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PreferencesError::from_io(parent, e))?;
    }

    let contents = serde_json::to_string_pretty(preferences).map_err(|source| {
        PreferencesError::Malformed {
            path: path.to_path_buf(),
            source,
        }
    })?;

    fs::write(path, contents).map_err(|e| PreferencesError::from_io(path, e))
}

/// In-memory preferences bound to their file.
#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    preferences: Preferences,
}

impl PreferencesStore {
    /// Load preferences, seeding and saving a fresh file when none can be read.
    ///
    /// `current_autostart` is only consulted when seeding.
    pub fn open(path: PathBuf, current_autostart: impl FnOnce() -> bool) -> Self {
        match load(&path) {
            Ok(preferences) => {
                emit(
                    Level::Debug,
                    "preferences.loaded",
                    &format!("Loaded preferences from {}", path.display()),
                    None,
                );
                return Self { path, preferences };
            }
            Err(PreferencesError::NotFound(_)) => {
                emit(
                    Level::Debug,
                    "preferences.first_run",
                    &format!("No preferences at {}, creating them", path.display()),
                    None,
                );
            }
            Err(e @ PreferencesError::Malformed { .. }) => {
                emit(
                    Level::Warn,
                    "preferences.malformed",
                    &format!("{}; replacing with defaults", e),
                    None,
                );
            }
            Err(e) => {
                emit(Level::Error, "preferences.load_error", &e.to_string(), None);
            }
        }

        let store = Self {
            path,
            preferences: Preferences::new(current_autostart()),
        };
        store.persist();
        store
    }

    pub fn autostart(&self) -> bool {
        self.preferences.autostart
    }

    pub fn set_autostart(&mut self, enabled: bool) {
        self.preferences.autostart = enabled;
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        save(&self.path, &self.preferences)
    }

    /// Save and report failures instead of returning them.
    pub fn persist(&self) {
        if let Err(e) = self.save() {
            emit(Level::Error, "preferences.save_error", &e.to_string(), None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = load(&temp_dir.path().join("manjaro-hello.json"));
        assert!(matches!(result, Err(PreferencesError::NotFound(_))));
    }

    #[test]
    fn test_load_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manjaro-hello.json");
        fs::write(&path, "{\"autostart\": tru").unwrap();

        assert!(matches!(
            load(&path),
            Err(PreferencesError::Malformed { .. })
        ));
    }

    #[test]
    fn test_wrong_type_is_malformed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manjaro-hello.json");
        fs::write(&path, "{\"autostart\": \"yes\"}").unwrap();

        assert!(matches!(
            load(&path),
            Err(PreferencesError::Malformed { .. })
        ));
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("manjaro-hello.json");

        for autostart in [true, false] {
            let prefs = Preferences::new(autostart);
            save(&path, &prefs).unwrap();
            assert_eq!(load(&path).unwrap(), prefs);
        }
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manjaro-hello.json");
        fs::write(&path, r#"{"autostart": true, "theme": "dark"}"#).unwrap();

        let mut store = PreferencesStore::open(path.clone(), || unreachable!());
        assert!(store.autostart());
        store.set_autostart(false);
        store.save().unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["autostart"], serde_json::Value::Bool(false));
        assert_eq!(raw["theme"], serde_json::Value::String("dark".into()));
    }

    #[test]
    fn test_open_seeds_first_run() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manjaro-hello.json");

        let store = PreferencesStore::open(path.clone(), || true);
        assert!(store.autostart());
        assert_eq!(load(&path).unwrap(), Preferences::new(true));
    }

    #[test]
    fn test_open_replaces_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("manjaro-hello.json");
        fs::write(&path, "not json").unwrap();

        let store = PreferencesStore::open(path.clone(), || false);
        assert!(!store.autostart());
        assert_eq!(load(&path).unwrap(), Preferences::new(false));
    }
}
