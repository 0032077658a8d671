//! Window controller: reacts to widget triggers

use anyhow::Result;
use ratatui::text::Text;

use crate::common::browser;
use crate::ui::prelude::*;

use super::Hello;
use super::layout::{AboutInfo, Layout, Tab};
use super::markup;
use super::pages::Page;
use super::state::{PageState, Trigger};

/// Shown in place of a page that could not be read in any language.
pub const MISSING_PAGE: &str = "<i>This page is not available.</i>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    Activate(Trigger),
    CloseAbout,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

type UrlOpener = Box<dyn FnMut(&str) -> Result<()>>;

pub struct WindowController {
    layout: Layout,
    hello: Hello,
    state: PageState,
    page_texts: [Text<'static>; 3],
    switch_active: bool,
    about_visible: bool,
    open_url: UrlOpener,
}

impl WindowController {
    pub fn new(layout: Layout, hello: Hello) -> Self {
        Self::with_url_opener(layout, hello, Box::new(browser::open_url))
    }

    pub fn with_url_opener(layout: Layout, hello: Hello, open_url: UrlOpener) -> Self {
        let page_texts = Page::ALL.map(|page| {
            let text = hello.pages.read_page(page);
            markup::render(text.as_deref().unwrap_or(MISSING_PAGE))
        });

        let mut controller = Self {
            state: layout.initial,
            layout,
            hello,
            page_texts,
            switch_active: false,
            about_visible: false,
            open_url,
        };

        let stored = controller.hello.preferences.autostart();
        controller.set_switch(stored);
        controller
    }

    /// Move the autostart switch, notifying the autostart manager on change.
    fn set_switch(&mut self, active: bool) {
        if self.switch_active == active {
            return;
        }
        self.switch_active = active;
        let hello = &mut self.hello;
        hello.autostart.set_autostart(active, &mut hello.preferences);
    }

    pub fn handle(&mut self, event: WindowEvent) -> Flow {
        match event {
            WindowEvent::Activate(trigger) => {
                self.activate(trigger);
                Flow::Continue
            }
            WindowEvent::CloseAbout => {
                self.about_visible = false;
                Flow::Continue
            }
            WindowEvent::Close => {
                emit(Level::Debug, "window.close", "Closing welcome window", None);
                Flow::Quit
            }
        }
    }

    fn activate(&mut self, trigger: Trigger) {
        match trigger {
            Trigger::Welcome(_) => {
                self.state = self.state.apply(trigger);
                emit(
                    Level::Debug,
                    "window.page",
                    &format!(
                        "Showing {} page {}",
                        self.state.child.widget_name(),
                        self.state.page_index
                    ),
                    None,
                );
            }
            Trigger::About => self.about_visible = true,
            Trigger::Social(network) => {
                let url = network.url();
                if let Err(e) = (self.open_url)(url) {
                    emit(
                        Level::Error,
                        "window.social.error",
                        &format!("Failed to open {}: {}", url, e),
                        None,
                    );
                }
            }
            Trigger::Autostart => {
                let active = !self.switch_active;
                self.set_switch(active);
            }
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn subtitle(&self) -> String {
        let subtitle = self.hello.system.subtitle();
        if self.hello.system.live {
            format!("{subtitle} (live)")
        } else {
            subtitle
        }
    }

    pub fn visible_tab(&self) -> Option<&Tab> {
        self.layout.tab(self.state)
    }

    pub fn page_text(&self, page: Page) -> &Text<'static> {
        &self.page_texts[page.index()]
    }

    pub fn switch_active(&self) -> bool {
        self.switch_active
    }

    /// The about dialog's contents while it is shown.
    pub fn about(&self) -> Option<&AboutInfo> {
        self.about_visible.then_some(&self.layout.about)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::distro::{Arch, SystemInfo};
    use crate::common::paths::AppPaths;
    use crate::welcome::pages::Locale;
    use crate::welcome::preferences;
    use crate::welcome::state::{SocialNetwork, StackChild, WelcomeButton};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    const LAYOUT: &str = include_str!("../../manjaro-hello.toml");

    struct Fixture {
        temp_dir: TempDir,
        paths: AppPaths,
    }

    impl Fixture {
        fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let data_dir = temp_dir.path().join("data");
            let paths = AppPaths::with_roots(&temp_dir.path().join("config"), &data_dir);

            fs::create_dir_all(data_dir.join("pages").join("en")).unwrap();
            fs::write(&paths.desktop_entry, "[Desktop Entry]\n").unwrap();
            for page in [Page::Readme, Page::Release] {
                fs::write(
                    paths.pages_dir.join("en").join(page.file_name()),
                    format!("<b>{}</b>", page.file_name()),
                )
                .unwrap();
            }

            Self { temp_dir, paths }
        }

        fn hello(&self) -> Hello {
            let system = SystemInfo::from_parts(&BTreeMap::new(), Arch::Bits64, false);
            Hello::init(&self.paths, Locale::default(), system)
        }

        fn controller(&self) -> WindowController {
            WindowController::with_url_opener(
                Layout::parse(LAYOUT).unwrap(),
                self.hello(),
                Box::new(|_: &str| Ok(())),
            )
        }
    }

    fn text_of(text: &Text<'_>) -> String {
        text.lines
            .iter()
            .flat_map(|line| line.spans.iter().map(|s| s.content.to_string()))
            .collect()
    }

    #[test]
    fn test_initial_state_from_layout() {
        let f = Fixture::new();
        let controller = f.controller();

        assert_eq!(
            controller.state(),
            PageState::new(StackChild::Documentation, 0)
        );
        assert_eq!(controller.visible_tab().map(|t| t.page), Some(Page::Readme));
        assert!(controller.about().is_none());
        assert!(!controller.switch_active());
    }

    #[test]
    fn test_pages_populated_at_startup() {
        let f = Fixture::new();
        let controller = f.controller();

        assert_eq!(text_of(controller.page_text(Page::Readme)), "readme");
        assert_eq!(text_of(controller.page_text(Page::Release)), "release");
        // No involved page on disk: the placeholder is shown instead.
        assert_eq!(
            text_of(controller.page_text(Page::Involved)),
            "This page is not available."
        );
    }

    #[test]
    fn test_welcome_buttons_navigate() {
        let f = Fixture::new();
        let mut controller = f.controller();

        let flow = controller.handle(WindowEvent::Activate(Trigger::Welcome(
            WelcomeButton::Involved,
        )));
        assert_eq!(flow, Flow::Continue);
        assert_eq!(controller.visible_tab().map(|t| t.page), Some(Page::Involved));

        controller.handle(WindowEvent::Activate(Trigger::Welcome(
            WelcomeButton::Release,
        )));
        assert_eq!(
            controller.state(),
            PageState::new(StackChild::Documentation, 1)
        );
        assert_eq!(controller.visible_tab().map(|t| t.page), Some(Page::Release));
    }

    #[test]
    fn test_about_dialog_hides_and_reopens() {
        let f = Fixture::new();
        let mut controller = f.controller();
        let before = controller.state();

        controller.handle(WindowEvent::Activate(Trigger::About));
        assert_eq!(
            controller.about().map(|a| a.program_name.as_str()),
            Some("Manjaro Hello")
        );

        controller.handle(WindowEvent::CloseAbout);
        assert!(controller.about().is_none());

        controller.handle(WindowEvent::Activate(Trigger::About));
        assert!(controller.about().is_some());
        assert_eq!(controller.state(), before);
    }

    #[test]
    fn test_social_opens_table_url() {
        let f = Fixture::new();
        let opened = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&opened);

        let mut controller = WindowController::with_url_opener(
            Layout::parse(LAYOUT).unwrap(),
            f.hello(),
            Box::new(move |url: &str| {
                sink.borrow_mut().push(url.to_string());
                Ok(())
            }),
        );

        controller.handle(WindowEvent::Activate(Trigger::Social(
            SocialNetwork::Facebook,
        )));
        assert_eq!(
            *opened.borrow(),
            vec!["https://www.facebook.com/ManjaroLinux".to_string()]
        );
    }

    #[test]
    fn test_failed_browser_keeps_running() {
        let f = Fixture::new();
        let mut controller = WindowController::with_url_opener(
            Layout::parse(LAYOUT).unwrap(),
            f.hello(),
            Box::new(|_: &str| Err(anyhow::anyhow!("no browser"))),
        );

        let flow = controller.handle(WindowEvent::Activate(Trigger::Social(
            SocialNetwork::Reddit,
        )));
        assert_eq!(flow, Flow::Continue);
    }

    #[test]
    fn test_autostart_switch_round_trip() {
        let f = Fixture::new();
        let mut controller = f.controller();

        controller.handle(WindowEvent::Activate(Trigger::Autostart));
        assert!(controller.switch_active());
        assert!(fs::symlink_metadata(&f.paths.autostart_entry).is_ok());
        assert!(preferences::load(&f.paths.preferences).unwrap().autostart);

        controller.handle(WindowEvent::Activate(Trigger::Autostart));
        assert!(!controller.switch_active());
        assert!(fs::symlink_metadata(&f.paths.autostart_entry).is_err());
        assert!(!preferences::load(&f.paths.preferences).unwrap().autostart);
    }

    #[test]
    fn test_stored_preference_restores_link() {
        let f = Fixture::new();
        preferences::save(&f.paths.preferences, &preferences::Preferences::new(true)).unwrap();

        let controller = f.controller();
        assert!(controller.switch_active());
        assert_eq!(
            fs::read_link(&f.paths.autostart_entry).unwrap(),
            f.paths.desktop_entry
        );
        assert!(f.temp_dir.path().join("config").join("autostart").is_dir());
    }

    #[test]
    fn test_close_quits() {
        let f = Fixture::new();
        let mut controller = f.controller();
        assert_eq!(controller.handle(WindowEvent::Close), Flow::Quit);
    }

    #[test]
    fn test_subtitle_marks_live_session() {
        let f = Fixture::new();
        let mut lsb = BTreeMap::new();
        lsb.insert("CODENAME".to_string(), "Gellivara".to_string());
        lsb.insert("RELEASE".to_string(), "17.0".to_string());
        let system = SystemInfo::from_parts(&lsb, Arch::Bits64, true);

        let controller = WindowController::with_url_opener(
            Layout::parse(LAYOUT).unwrap(),
            Hello::init(&f.paths, Locale::default(), system),
            Box::new(|_: &str| Ok(())),
        );
        assert_eq!(controller.subtitle(), "Gellivara 17.0 64-bit (live)");
    }
}
