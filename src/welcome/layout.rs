//! Declarative window definition
//!
//! The window's widgets, their labels and the signals they emit live in a TOML
//! file next to the pages. Loading resolves every widget to a [`Trigger`] up
//! front so a misspelled name fails at startup instead of doing nothing later.

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::pages::Page;
use super::state::{self, PageState, StackChild, Trigger, WelcomeButton};

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Failed to read window definition {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid window definition: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Widget '{name}' has no handler for signal '{signal}'")]
    UnknownWidget { signal: String, name: String },

    #[error("Widget '{0}' is declared more than once")]
    DuplicateWidget(String),

    #[error("Widget '{name}' has an invalid key '{key}' (expected a single character)")]
    InvalidKey { name: String, key: String },

    #[error("Widget '{name}' uses key '{key}', which the window already handles")]
    ReservedKey { name: String, key: char },

    #[error("Key '{key}' is bound to both '{first}' and '{second}'")]
    DuplicateKey {
        key: char,
        first: String,
        second: String,
    },

    #[error("Unknown stack child '{0}'")]
    UnknownStackChild(String),

    #[error("Unknown text widget '{0}'")]
    UnknownTextWidget(String),

    #[error("Stack child '{child}' has no page {index}")]
    MissingPage { child: String, index: usize },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LayoutFile {
    window: WindowDef,
    stack: StackDef,
    #[serde(default, rename = "widget")]
    widgets: Vec<WidgetDef>,
    about: AboutInfo,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowDef {
    title: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StackDef {
    visible_child: String,
    #[serde(rename = "child")]
    children: Vec<StackChildDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StackChildDef {
    name: String,
    #[serde(default)]
    current_page: usize,
    #[serde(rename = "page")]
    pages: Vec<TabDef>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TabDef {
    label: String,
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WidgetDef {
    name: String,
    signal: String,
    label: String,
    key: Option<String>,
}

/// Contents of the about dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AboutInfo {
    pub program_name: String,
    pub version: String,
    #[serde(default)]
    pub comments: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub license: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub label: String,
    pub page: Page,
}

/// One child of the stack with its tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pane {
    pub child: StackChild,
    pub tabs: Vec<Tab>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Widget {
    pub label: String,
    pub trigger: Trigger,
    pub key: Option<char>,
}

/// A validated window definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub title: String,
    pub initial: PageState,
    pub panes: Vec<Pane>,
    pub widgets: Vec<Widget>,
    pub about: AboutInfo,
}

impl Layout {
    pub fn load(path: &Path) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, LayoutError> {
        let file: LayoutFile = toml::from_str(contents)?;

        let panes = file
            .stack
            .children
            .iter()
            .map(resolve_pane)
            .collect::<Result<Vec<_>, _>>()?;

        let widgets = resolve_widgets(&file.widgets)?;

        let visible = StackChild::from_widget_name(&file.stack.visible_child)
            .ok_or_else(|| LayoutError::UnknownStackChild(file.stack.visible_child.clone()))?;
        let current_page = file
            .stack
            .children
            .iter()
            .find(|c| c.name == file.stack.visible_child)
            .map(|c| c.current_page)
            .unwrap_or(0);

        let layout = Self {
            title: file.window.title,
            initial: PageState::new(visible, current_page),
            panes,
            widgets,
            about: file.about,
        };

        layout.check_reachable(layout.initial)?;
        for button in welcome_buttons(&layout) {
            layout.check_reachable(button.target())?;
        }

        Ok(layout)
    }

    pub fn pane(&self, child: StackChild) -> Option<&Pane> {
        self.panes.iter().find(|p| p.child == child)
    }

    /// The tab displayed for a page state, if the definition has it.
    pub fn tab(&self, state: PageState) -> Option<&Tab> {
        self.pane(state.child)
            .and_then(|pane| pane.tabs.get(state.page_index))
    }

    fn check_reachable(&self, state: PageState) -> Result<(), LayoutError> {
        match self.tab(state) {
            Some(_) => Ok(()),
            None => Err(LayoutError::MissingPage {
                child: state.child.widget_name().to_string(),
                index: state.page_index,
            }),
        }
    }
}

fn resolve_pane(def: &StackChildDef) -> Result<Pane, LayoutError> {
    let child = StackChild::from_widget_name(&def.name)
        .ok_or_else(|| LayoutError::UnknownStackChild(def.name.clone()))?;

    let tabs = def
        .pages
        .iter()
        .map(|tab| {
            state::page_for_text_widget(&tab.text)
                .map(|page| Tab {
                    label: tab.label.clone(),
                    page,
                })
                .ok_or_else(|| LayoutError::UnknownTextWidget(tab.text.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Pane { child, tabs })
}

/// Keys the window handles itself; a widget hotkey on one would never fire.
const RESERVED_KEYS: &[char] = &['q', 'j', 'k', ' '];

fn resolve_widgets(defs: &[WidgetDef]) -> Result<Vec<Widget>, LayoutError> {
    let mut seen = BTreeSet::new();
    let mut keys: BTreeMap<char, &str> = BTreeMap::new();
    let mut widgets = Vec::with_capacity(defs.len());

    for def in defs {
        if !seen.insert(def.name.as_str()) {
            return Err(LayoutError::DuplicateWidget(def.name.clone()));
        }

        let trigger =
            state::bind(&def.signal, &def.name).ok_or_else(|| LayoutError::UnknownWidget {
                signal: def.signal.clone(),
                name: def.name.clone(),
            })?;

        let key = match def.key.as_deref() {
            None => None,
            Some(key) => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => {
                        return Err(LayoutError::InvalidKey {
                            name: def.name.clone(),
                            key: key.to_string(),
                        });
                    }
                }
            }
        };

        if let Some(key) = key {
            if RESERVED_KEYS.contains(&key) {
                return Err(LayoutError::ReservedKey {
                    name: def.name.clone(),
                    key,
                });
            }
            if let Some(first) = keys.insert(key, &def.name) {
                return Err(LayoutError::DuplicateKey {
                    key,
                    first: first.to_string(),
                    second: def.name.clone(),
                });
            }
        }

        widgets.push(Widget {
            label: def.label.clone(),
            trigger,
            key,
        });
    }

    Ok(widgets)
}

/// Welcome buttons present in a layout, in declaration order.
fn welcome_buttons(layout: &Layout) -> Vec<WelcomeButton> {
    layout
        .widgets
        .iter()
        .filter_map(|w| match w.trigger {
            Trigger::Welcome(button) => Some(button),
            _ => None,
        })
        .collect()
}
