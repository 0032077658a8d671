use anyhow::{Result, anyhow};
use std::io;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

/// Openers tried in order when handing a URL to the desktop.
const OPENERS: &[&str] = &["xdg-open", "firefox", "chromium"];

/// Open `url` in the user's default browser without blocking.
///
/// The child's stdio is detached so it cannot draw over the terminal window.
pub fn open_url(url: &str) -> Result<()> {
    let mut last_error = None;

    for opener in OPENERS {
        if which::which(opener).is_err() {
            continue;
        }

        match spawn_detached(opener, url) {
            Ok(_) => return Ok(()),
            Err(e) => last_error = Some(anyhow!("{} failed: {}", opener, e)),
        }
    }

    Err(last_error.unwrap_or_else(|| {
        anyhow!(
            "No browser opener found (tried {})",
            OPENERS.join(", ")
        )
    }))
}

/// Spawn `program arg` with null stdio and reap it on a background thread.
///
/// The returned handle finishes once the child has exited.
fn spawn_detached(program: &str, arg: &str) -> io::Result<JoinHandle<()>> {
    let mut child = Command::new(program)
        .arg(arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(thread::spawn(move || {
        let _ = child.wait();
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawned_child_is_reaped() {
        let handle = spawn_detached("true", "https://manjaro.org").unwrap();
        assert!(handle.join().is_ok());
    }

    #[test]
    fn test_missing_program_fails_to_spawn() {
        assert!(spawn_detached("manjaro-hello-no-such-opener", "https://manjaro.org").is_err());
    }
}
