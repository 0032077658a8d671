//! Localized documentation pages

use std::fmt;
use std::fs;
use std::path::PathBuf;

use crate::ui::prelude::*;

pub const DEFAULT_LANGUAGE: &str = "en";

/// Environment variables consulted for the UI language, highest priority first.
const LOCALE_VARS: &[&str] = &["LC_ALL", "LC_MESSAGES", "LANG"];

/// Two-letter language code used to pick the page directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locale(String);

impl Locale {
    /// Derive the language from the process environment.
    pub fn from_env() -> Self {
        let value = LOCALE_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty());

        match value {
            Some(value) => Self::parse(&value),
            None => Self::default(),
        }
    }

    /// Parse a locale string such as `de_DE.UTF-8`.
    pub fn parse(value: &str) -> Self {
        if value == "C" || value.starts_with("C.") || value == "POSIX" {
            return Self::default();
        }

        let language: String = value.chars().take(2).collect();
        if language.len() == 2 && language.chars().all(|c| c.is_ascii_alphabetic()) {
            Self(language.to_ascii_lowercase())
        } else {
            Self::default()
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self(DEFAULT_LANGUAGE.to_string())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Readme,
    Release,
    Involved,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Readme, Page::Release, Page::Involved];

    pub fn index(self) -> usize {
        match self {
            Page::Readme => 0,
            Page::Release => 1,
            Page::Involved => 2,
        }
    }

    /// File name under `pages/<locale>/`.
    pub fn file_name(self) -> &'static str {
        match self {
            Page::Readme => "readme",
            Page::Release => "release",
            Page::Involved => "involved",
        }
    }
}

/// Resolves page names to files for one locale. Every read goes to disk.
#[derive(Debug, Clone)]
pub struct PageLoader {
    pages_dir: PathBuf,
    locale: Locale,
}

impl PageLoader {
    pub fn new(pages_dir: PathBuf, locale: Locale) -> Self {
        Self { pages_dir, locale }
    }

    /// Path of the page in the user's language, or the default language when missing.
    pub fn resolve(&self, page: Page) -> PathBuf {
        let localized = self.page_path(self.locale.as_str(), page);
        if localized.exists() {
            localized
        } else {
            self.page_path(DEFAULT_LANGUAGE, page)
        }
    }

    /// Read a page's text, `None` if it cannot be read in either language.
    pub fn read_page(&self, page: Page) -> Option<String> {
        let path = self.resolve(page);
        match fs::read_to_string(&path) {
            Ok(text) => Some(text),
            Err(e) => {
                emit(
                    Level::Error,
                    "pages.read_error",
                    &format!("Failed to read page {}: {}", path.display(), e),
                    None,
                );
                None
            }
        }
    }

    fn page_path(&self, language: &str, page: Page) -> PathBuf {
        self.pages_dir.join(language).join(page.file_name())
    }
}
