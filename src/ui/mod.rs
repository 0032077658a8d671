use colored::*;
use lazy_static::lazy_static;
use serde::Serialize;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

pub mod catppuccin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Error | Level::Warn)
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    pub format: OutputFormat,
    pub color: bool,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: true,
        }
    }
}

/// An event recorded while the terminal window owns the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    pub level: Level,
    pub code: String,
    pub message: String,
}

lazy_static! {
    static ref RENDERER: RwLock<Renderer> = RwLock::new(Renderer::default());
    static ref CAPTURED: Mutex<Vec<CapturedEvent>> = Mutex::new(Vec::new());
}

static DEBUG_MODE: AtomicBool = AtomicBool::new(false);
static CAPTURE_MODE: AtomicBool = AtomicBool::new(false);

pub fn set_debug_mode(enabled: bool) {
    DEBUG_MODE.store(enabled, Ordering::Relaxed);
}

pub fn is_debug_enabled() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

pub fn init(format: OutputFormat, color: bool) {
    if let Ok(mut r) = RENDERER.write() {
        r.format = format;
        r.color = color;
    }
}

/// Route events into memory instead of the terminal.
///
/// Writing to stdout/stderr while the alternate screen is active would draw
/// over the window, so the window turns capture on for its lifetime.
pub fn begin_capture() {
    CAPTURE_MODE.store(true, Ordering::SeqCst);
}

/// Stop capturing and return everything recorded since `begin_capture`.
pub fn end_capture() -> Vec<CapturedEvent> {
    CAPTURE_MODE.store(false, Ordering::SeqCst);
    match CAPTURED.lock() {
        Ok(mut events) => std::mem::take(&mut *events),
        Err(_) => Vec::new(),
    }
}

/// Most recent captured event, used for the window's status bar.
pub fn last_captured() -> Option<CapturedEvent> {
    CAPTURED.lock().ok().and_then(|events| events.last().cloned())
}

#[derive(Serialize)]
struct Event<'a> {
    level: &'a str,
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

fn colorize(level: Level, s: &str, enable: bool) -> String {
    if !enable {
        return s.to_string();
    }
    match level {
        Level::Info => s.normal().to_string(),
        Level::Warn => s.yellow().bold().to_string(),
        Level::Error => s.red().bold().to_string(),
        Level::Debug => s.cyan().to_string(),
    }
}

pub fn emit(level: Level, code: &str, message: &str, data: Option<serde_json::Value>) {
    if level == Level::Debug && !is_debug_enabled() {
        return;
    }

    if CAPTURE_MODE.load(Ordering::SeqCst) {
        if let Ok(mut events) = CAPTURED.lock() {
            events.push(CapturedEvent {
                level,
                code: code.to_string(),
                message: message.to_string(),
            });
        }
        return;
    }

    let r = RENDERER.read().map(|r| r.clone()).unwrap_or_default();
    let line = match r.format {
        OutputFormat::Text => colorize(level, message, r.color),
        OutputFormat::Json => {
            let ev = Event {
                level: level.as_str(),
                code,
                message,
                data,
            };
            match serde_json::to_string(&ev) {
                Ok(s) => s,
                Err(_) => return,
            }
        }
    };

    let mut out: Box<dyn Write> = if level.to_stderr() {
        Box::new(io::stderr())
    } else {
        Box::new(io::stdout())
    };
    let _ = writeln!(out, "{}", line);
}

/// Replay captured warnings and errors once the screen is released.
pub fn flush_captured(events: &[CapturedEvent]) {
    for event in events.iter().filter(|e| e.level.to_stderr()) {
        emit(event.level, &event.code, &event.message, None);
    }
}

pub mod prelude {
    pub use super::{Level, OutputFormat, emit};
}
