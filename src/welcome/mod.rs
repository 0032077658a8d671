//! Welcome application for Manjaro first-time setup
//!
//! Shows localized documentation, release information and community links,
//! and lets the user decide whether the app starts at login.

pub mod autostart;
pub mod controller;
pub mod layout;
pub mod markup;
pub mod pages;
pub mod preferences;
pub mod state;
mod ui;

use anyhow::{Context, Result};

use crate::common::distro::SystemInfo;
use crate::common::paths::AppPaths;
use crate::ui::prelude::*;

use autostart::AutostartManager;
use controller::WindowController;
use layout::Layout;
use pages::{Locale, PageLoader};
use preferences::PreferencesStore;

/// The components the window works with.
#[derive(Debug)]
pub struct Hello {
    pub preferences: PreferencesStore,
    pub autostart: AutostartManager,
    pub pages: PageLoader,
    pub system: SystemInfo,
}

impl Hello {
    /// Assemble the components, creating preferences on first run.
    pub fn init(paths: &AppPaths, locale: Locale, system: SystemInfo) -> Self {
        let autostart =
            AutostartManager::new(paths.autostart_entry.clone(), paths.desktop_entry.clone());
        let preferences =
            PreferencesStore::open(paths.preferences.clone(), || autostart.is_enabled());
        let pages = PageLoader::new(paths.pages_dir.clone(), locale);

        Self {
            preferences,
            autostart,
            pages,
            system,
        }
    }
}

pub fn run_welcome(paths: &AppPaths) -> Result<()> {
    let layout = Layout::load(&paths.layout)
        .with_context(|| format!("loading window definition {}", paths.layout.display()))?;

    let locale = Locale::from_env();
    emit(
        Level::Debug,
        "welcome.start",
        &format!("Starting welcome window (language: {})", locale),
        None,
    );

    let hello = Hello::init(paths, locale, SystemInfo::detect());
    let controller = WindowController::new(layout, hello);

    ui::run_window(controller)
}
