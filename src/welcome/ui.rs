//! Terminal window for the welcome application

use std::io::stdout;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Flex, Layout as Split, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};

use crate::ui::catppuccin::{color, colors};
use crate::ui::{self as output, Level};

use super::controller::{Flow, WindowController, WindowEvent};
use super::layout::{AboutInfo, Widget};
use super::state::Trigger;

const POLL_TIMEOUT: Duration = Duration::from_millis(200);
const SIDEBAR_WIDTH: u16 = 30;
const SCROLL_STEP: u16 = 10;
const HINT: &str = "Tab/↑↓ move  Enter activate  PgUp/PgDn scroll  a about  q quit";

/// Run the welcome window until it is closed.
pub fn run_window(controller: WindowController) -> Result<()> {
    output::begin_capture();

    let result = WelcomeWindow::new(controller).and_then(|mut window| {
        let result = window.run();
        window.cleanup()?;
        result
    });

    let events = output::end_capture();
    output::flush_captured(&events);
    result
}

struct WelcomeWindow {
    terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    controller: WindowController,
    focus: usize,
    scroll: u16,
    sidebar_area: Option<Rect>,
    page_area: Option<Rect>,
    cleaned_up: bool,
}

impl WelcomeWindow {
    fn new(controller: WindowController) -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;

        Ok(Self {
            terminal,
            controller,
            focus: 0,
            scroll: 0,
            sidebar_area: None,
            page_area: None,
            cleaned_up: false,
        })
    }

    fn run(&mut self) -> Result<()> {
        loop {
            self.draw()?;

            if !event::poll(POLL_TIMEOUT)? {
                continue;
            }

            let window_event = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key(key),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => {
                        self.on_click(mouse.column, mouse.row)
                    }
                    MouseEventKind::ScrollDown if self.over_page(mouse.column, mouse.row) => {
                        self.scroll = self.scroll.saturating_add(1);
                        None
                    }
                    MouseEventKind::ScrollUp if self.over_page(mouse.column, mouse.row) => {
                        self.scroll = self.scroll.saturating_sub(1);
                        None
                    }
                    _ => None,
                },
                _ => None,
            };

            if let Some(window_event) = window_event {
                let before = self.controller.state();
                if self.controller.handle(window_event) == Flow::Quit {
                    return Ok(());
                }
                if self.controller.state() != before {
                    self.scroll = 0;
                }
            }
        }
    }

    fn widgets(&self) -> &[Widget] {
        &self.controller.layout().widgets
    }

    fn on_key(&mut self, key: KeyEvent) -> Option<WindowEvent> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(WindowEvent::Close);
        }

        if self.controller.about().is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => Some(WindowEvent::CloseAbout),
                _ => None,
            };
        }

        let count = self.widgets().len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => Some(WindowEvent::Close),
            KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => {
                if count > 0 {
                    self.focus = (self.focus + 1) % count;
                }
                None
            }
            KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => {
                if count > 0 {
                    self.focus = (self.focus + count - 1) % count;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char(' ') => self
                .widgets()
                .get(self.focus)
                .map(|w| WindowEvent::Activate(w.trigger)),
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_add(SCROLL_STEP);
                None
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(SCROLL_STEP);
                None
            }
            KeyCode::Home => {
                self.scroll = 0;
                None
            }
            KeyCode::Char(c) => {
                let (index, trigger) = self
                    .widgets()
                    .iter()
                    .enumerate()
                    .find(|(_, w)| w.key == Some(c))
                    .map(|(i, w)| (i, w.trigger))?;
                self.focus = index;
                Some(WindowEvent::Activate(trigger))
            }
            _ => None,
        }
    }

    fn over_page(&self, column: u16, row: u16) -> bool {
        self.page_area
            .is_some_and(|area| area.contains(ratatui::layout::Position::new(column, row)))
    }

    fn on_click(&mut self, column: u16, row: u16) -> Option<WindowEvent> {
        if self.controller.about().is_some() {
            return Some(WindowEvent::CloseAbout);
        }

        let area = self.sidebar_area?;
        let inside = column > area.x
            && column < area.x + area.width.saturating_sub(1)
            && row > area.y
            && row < area.y + area.height.saturating_sub(1);
        if !inside {
            return None;
        }

        let index = usize::from(row - area.y - 1);
        let widget = self.widgets().get(index)?;
        let trigger = widget.trigger;
        self.focus = index;
        Some(WindowEvent::Activate(trigger))
    }

    fn draw(&mut self) -> Result<()> {
        let controller = &self.controller;
        let focus = self.focus;
        let scroll = self.scroll;
        let mut sidebar_area = None;
        let mut page_area = None;

        self.terminal.draw(|f| {
            let size = f.area();
            f.render_widget(
                Block::default().style(
                    Style::default()
                        .bg(color(colors::BASE))
                        .fg(color(colors::TEXT)),
                ),
                size,
            );

            let [header, body, status] = Split::vertical([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .areas(size);

            draw_header(f, header, controller);

            let [sidebar, page] =
                Split::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
                    .areas(body);
            draw_sidebar(f, sidebar, controller, focus);
            draw_page(f, page, controller, scroll);
            draw_status(f, status);

            if let Some(about) = controller.about() {
                draw_about(f, size, about);
            }

            sidebar_area = Some(sidebar);
            page_area = Some(page);
        })?;

        self.sidebar_area = sidebar_area;
        self.page_area = page_area;
        Ok(())
    }

    fn cleanup(&mut self) -> Result<()> {
        if self.cleaned_up {
            return Ok(());
        }
        disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        self.terminal.show_cursor()?;
        self.cleaned_up = true;
        Ok(())
    }
}

impl Drop for WelcomeWindow {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

fn draw_header(f: &mut ratatui::Frame, area: Rect, controller: &WindowController) {
    let title = Paragraph::new(Line::from(vec![
        Span::styled(
            controller.layout().title.clone(),
            Style::default()
                .fg(color(colors::GREEN))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", controller.subtitle()),
            Style::default().fg(color(colors::SUBTEXT0)),
        ),
    ]))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(colors::SURFACE1))),
    );
    f.render_widget(title, area);
}

fn widget_line(widget: &Widget, focused: bool, switch_active: bool) -> Line<'static> {
    let (label, style) = match widget.trigger {
        trigger if trigger.is_switch() => {
            let (mark, fg) = if switch_active {
                ("[on] ", colors::GREEN)
            } else {
                ("[off]", colors::PEACH)
            };
            (format!("{} {}", mark, widget.label), Style::default().fg(color(fg)))
        }
        trigger if trigger.is_link() => (
            format!("↗ {}", widget.label),
            Style::default().fg(color(colors::BLUE)),
        ),
        _ => (widget.label.clone(), Style::default().fg(color(colors::TEXT))),
    };

    let style = if focused {
        style
            .bg(color(colors::SURFACE0))
            .add_modifier(Modifier::BOLD)
    } else {
        style
    };

    let pointer = if focused { "▌" } else { " " };
    let mut spans = vec![
        Span::styled(pointer, Style::default().fg(color(colors::ROSEWATER))),
        Span::styled(label, style),
    ];
    if let Some(key) = widget.key {
        spans.push(Span::styled(
            format!("  {key}"),
            Style::default().fg(color(colors::OVERLAY0)),
        ));
    }
    Line::from(spans)
}

fn draw_sidebar(f: &mut ratatui::Frame, area: Rect, controller: &WindowController, focus: usize) {
    let lines: Vec<Line> = controller
        .layout()
        .widgets
        .iter()
        .enumerate()
        .map(|(i, w)| widget_line(w, i == focus, controller.switch_active()))
        .collect();

    let sidebar = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(colors::SURFACE1)))
            .title(" Welcome "),
    );
    f.render_widget(sidebar, area);
}

fn draw_page(f: &mut ratatui::Frame, area: Rect, controller: &WindowController, scroll: u16) {
    let state = controller.state();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(colors::SURFACE1)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [tabs_area, text_area] =
        Split::vertical([Constraint::Length(2), Constraint::Min(1)]).areas(inner);

    if let Some(pane) = controller.layout().pane(state.child) {
        let tabs = Tabs::new(pane.tabs.iter().map(|t| t.label.clone()))
            .select(state.page_index)
            .style(Style::default().fg(color(colors::OVERLAY1)))
            .highlight_style(
                Style::default()
                    .fg(color(colors::MAUVE))
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            );
        f.render_widget(tabs, tabs_area);
    }

    if let Some(tab) = controller.visible_tab() {
        let text = Paragraph::new(controller.page_text(tab.page).clone())
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0));
        f.render_widget(text, text_area);
    }
}

fn draw_status(f: &mut ratatui::Frame, area: Rect) {
    let line = match output::last_captured() {
        Some(event) if event.level == Level::Error => Line::from(Span::styled(
            event.message,
            Style::default().fg(color(colors::RED)),
        )),
        Some(event) if event.level == Level::Warn => Line::from(Span::styled(
            event.message,
            Style::default().fg(color(colors::YELLOW)),
        )),
        _ => Line::from(Span::styled(
            HINT,
            Style::default().fg(color(colors::OVERLAY0)),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn draw_about(f: &mut ratatui::Frame, size: Rect, about: &AboutInfo) {
    let [row] = Split::vertical([Constraint::Length(14)])
        .flex(Flex::Center)
        .areas(size);
    let [area] = Split::horizontal([Constraint::Percentage(60)])
        .flex(Flex::Center)
        .areas(row);

    let mut lines = vec![
        Line::from(Span::styled(
            format!("{} {}", about.program_name, about.version),
            Style::default()
                .fg(color(colors::GREEN))
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    if !about.comments.is_empty() {
        lines.push(Line::from(about.comments.clone()));
    }
    if !about.website.is_empty() {
        lines.push(Line::from(Span::styled(
            about.website.clone(),
            Style::default()
                .fg(color(colors::BLUE))
                .add_modifier(Modifier::UNDERLINED),
        )));
    }
    if !about.authors.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(format!("Authors: {}", about.authors.join(", "))));
    }
    if !about.license.is_empty() {
        lines.push(Line::from(Span::styled(
            about.license.clone(),
            Style::default().fg(color(colors::SUBTEXT0)),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press Enter or Esc to close",
        Style::default().fg(color(colors::OVERLAY0)),
    )));

    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(colors::MAUVE)))
                .title(" About ")
                .style(Style::default().bg(color(colors::MANTLE))),
        );

    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(trigger: Trigger, key: Option<char>) -> Widget {
        Widget {
            label: "Label".to_string(),
            trigger,
            key,
        }
    }

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_switch_line_shows_state() {
        let w = widget(Trigger::Autostart, Some('s'));
        assert_eq!(plain(&widget_line(&w, false, true)), " [on]  Label  s");
        assert_eq!(plain(&widget_line(&w, false, false)), " [off] Label  s");
    }

    #[test]
    fn test_link_and_focus_markers() {
        use crate::welcome::state::SocialNetwork;

        let w = widget(Trigger::Social(SocialNetwork::Reddit), None);
        assert_eq!(plain(&widget_line(&w, true, false)), "▌↗ Label");
        assert_eq!(plain(&widget_line(&w, false, false)), " ↗ Label");
    }
}
