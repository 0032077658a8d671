//! Login autostart entry management

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::ui::prelude::*;

use super::preferences::PreferencesStore;

/// Keeps the autostart symlink in step with the stored preference.
#[derive(Debug, Clone)]
pub struct AutostartManager {
    entry: PathBuf,
    desktop_file: PathBuf,
}

impl AutostartManager {
    pub fn new(entry: PathBuf, desktop_file: PathBuf) -> Self {
        Self {
            entry,
            desktop_file,
        }
    }

    /// Whether something occupies the autostart path.
    ///
    /// The link itself is inspected, so a dangling link still counts.
    pub fn is_enabled(&self) -> bool {
        fs::symlink_metadata(&self.entry).is_ok()
    }

    /// Create or remove the autostart entry, then record `enable` in `store`.
    ///
    /// Filesystem failures are reported and do not stop the preference update.
    pub fn set_autostart(&self, enable: bool, store: &mut PreferencesStore) {
        let present = self.is_enabled();

        if enable && !present {
            match self.create_link() {
                Ok(()) => emit(
                    Level::Info,
                    "autostart.enabled",
                    &format!(
                        "Linked {} -> {}",
                        self.entry.display(),
                        self.desktop_file.display()
                    ),
                    None,
                ),
                Err(e) => emit(
                    Level::Error,
                    "autostart.enable_error",
                    &format!("Failed to create {}: {}", self.entry.display(), e),
                    None,
                ),
            }
        } else if !enable && present {
            match fs::remove_file(&self.entry) {
                Ok(()) => emit(
                    Level::Info,
                    "autostart.disabled",
                    &format!("Removed {}", self.entry.display()),
                    None,
                ),
                Err(e) => emit(
                    Level::Error,
                    "autostart.disable_error",
                    &format!("Failed to remove {}: {}", self.entry.display(), e),
                    None,
                ),
            }
        }

        store.set_autostart(enable);
        store.persist();
    }

    fn create_link(&self) -> io::Result<()> {
        if let Some(parent) = self.entry.parent() {
            fs::create_dir_all(parent)?;
        }
        std::os::unix::fs::symlink(&self.desktop_file, &self.entry)
    }
}
