//! Page navigation and widget triggers

use super::pages::Page;

/// Children of the window's two-pane stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackChild {
    Documentation,
    Project,
}

impl StackChild {
    pub const ALL: [StackChild; 2] = [StackChild::Documentation, StackChild::Project];

    /// Name the child carries in the window definition.
    pub fn widget_name(self) -> &'static str {
        match self {
            StackChild::Documentation => "documentation",
            StackChild::Project => "project",
        }
    }

    pub fn from_widget_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|child| child.widget_name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WelcomeButton {
    Readme,
    Release,
    Involved,
}

impl WelcomeButton {
    /// Where each button leads: stack child and page within it.
    pub fn target(self) -> PageState {
        match self {
            WelcomeButton::Readme => PageState::new(StackChild::Documentation, 0),
            WelcomeButton::Release => PageState::new(StackChild::Documentation, 1),
            WelcomeButton::Involved => PageState::new(StackChild::Project, 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialNetwork {
    GooglePlus,
    Facebook,
    Twitter,
    Reddit,
}

impl SocialNetwork {
    pub fn url(self) -> &'static str {
        match self {
            SocialNetwork::GooglePlus => "https://plus.google.com/118244873957924966264",
            SocialNetwork::Facebook => "https://www.facebook.com/ManjaroLinux",
            SocialNetwork::Twitter => "https://twitter.com/ManjaroLinux",
            SocialNetwork::Reddit => "https://www.reddit.com/r/ManjaroLinux",
        }
    }
}

/// Everything a widget in the window can ask the controller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Welcome(WelcomeButton),
    About,
    Social(SocialNetwork),
    Autostart,
}

impl Trigger {
    pub fn is_switch(self) -> bool {
        matches!(self, Trigger::Autostart)
    }

    pub fn is_link(self) -> bool {
        matches!(self, Trigger::Social(_))
    }
}

/// Signal and widget name pairs understood by the controller.
const BINDINGS: &[(&str, &str, Trigger)] = &[
    (
        "on_welcome_btn_clicked",
        "readmebtn",
        Trigger::Welcome(WelcomeButton::Readme),
    ),
    (
        "on_welcome_btn_clicked",
        "releasebtn",
        Trigger::Welcome(WelcomeButton::Release),
    ),
    (
        "on_welcome_btn_clicked",
        "involvedbtn",
        Trigger::Welcome(WelcomeButton::Involved),
    ),
    ("on_about_clicked", "about", Trigger::About),
    (
        "on_social_pressed",
        "google+",
        Trigger::Social(SocialNetwork::GooglePlus),
    ),
    (
        "on_social_pressed",
        "facebook",
        Trigger::Social(SocialNetwork::Facebook),
    ),
    (
        "on_social_pressed",
        "twitter",
        Trigger::Social(SocialNetwork::Twitter),
    ),
    (
        "on_social_pressed",
        "reddit",
        Trigger::Social(SocialNetwork::Reddit),
    ),
    ("on_autostart_switched", "autostart", Trigger::Autostart),
];

/// Look up the trigger bound to a widget's signal.
pub fn bind(signal: &str, widget: &str) -> Option<Trigger> {
    BINDINGS
        .iter()
        .find(|(s, w, _)| *s == signal && *w == widget)
        .map(|(_, _, trigger)| *trigger)
}

/// Text widgets that display a page.
pub fn page_for_text_widget(name: &str) -> Option<Page> {
    match name {
        "readmetext" => Some(Page::Readme),
        "releasetext" => Some(Page::Release),
        "involvedtext" => Some(Page::Involved),
        _ => None,
    }
}

/// Visible stack child and the page shown inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    pub child: StackChild,
    pub page_index: usize,
}

impl PageState {
    pub const fn new(child: StackChild, page_index: usize) -> Self {
        Self { child, page_index }
    }

    /// Apply a trigger. Only welcome buttons move between pages.
    pub fn apply(self, trigger: Trigger) -> Self {
        match trigger {
            Trigger::Welcome(button) => button.target(),
            Trigger::About | Trigger::Social(_) | Trigger::Autostart => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_button_table() {
        let start = PageState::new(StackChild::Project, 0);

        assert_eq!(
            start.apply(Trigger::Welcome(WelcomeButton::Readme)),
            PageState::new(StackChild::Documentation, 0)
        );
        assert_eq!(
            start.apply(Trigger::Welcome(WelcomeButton::Release)),
            PageState::new(StackChild::Documentation, 1)
        );
        assert_eq!(
            PageState::new(StackChild::Documentation, 1)
                .apply(Trigger::Welcome(WelcomeButton::Involved)),
            PageState::new(StackChild::Project, 0)
        );
    }

    #[test]
    fn test_other_triggers_keep_page() {
        let start = PageState::new(StackChild::Documentation, 1);
        for trigger in [
            Trigger::About,
            Trigger::Autostart,
            Trigger::Social(SocialNetwork::Reddit),
        ] {
            assert_eq!(start.apply(trigger), start);
        }
    }

    #[test]
    fn test_bind() {
        assert_eq!(
            bind("on_welcome_btn_clicked", "releasebtn"),
            Some(Trigger::Welcome(WelcomeButton::Release))
        );
        assert_eq!(
            bind("on_social_pressed", "google+"),
            Some(Trigger::Social(SocialNetwork::GooglePlus))
        );
        assert_eq!(bind("on_welcome_btn_clicked", "readmebutton"), None);
        assert_eq!(bind("on_social_pressed", "readmebtn"), None);
    }

    #[test]
    fn test_social_urls() {
        assert_eq!(
            SocialNetwork::Reddit.url(),
            "https://www.reddit.com/r/ManjaroLinux"
        );
        assert!(SocialNetwork::Twitter.url().starts_with("https://twitter.com/"));
    }

    #[test]
    fn test_stack_child_names() {
        assert_eq!(
            StackChild::from_widget_name("project"),
            Some(StackChild::Project)
        );
        assert_eq!(StackChild::from_widget_name("docs"), None);
        assert_eq!(page_for_text_widget("involvedtext"), Some(Page::Involved));
    }
}
