//! Stderr spinner for long polls.

use std::cell::RefCell;
use std::future::Future;
use std::io::{IsTerminal, Write};
use std::time::Duration;

use tokio::task::JoinHandle;

const FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

/// Animates `msg` on stderr while a wait is in flight.
///
/// Draws nothing unless enabled and stderr is a terminal, so piped output
/// and JSON mode stay clean.
pub struct Spinner {
    msg: String,
    enabled: bool,
    task: RefCell<Option<JoinHandle<()>>>,
}

impl Spinner {
    pub fn new(msg: impl Into<String>, enabled: bool) -> Self {
        Self {
            msg: msg.into(),
            enabled: enabled && std::io::stderr().is_terminal(),
            task: RefCell::new(None),
        }
    }

    pub fn is_active(&self) -> bool { self.task.borrow().is_some() }

    pub fn start(&self) {
        if !self.enabled || self.is_active() {
            return;
        }
        let msg = self.msg.clone();
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_millis(120));
            for frame in FRAMES.iter().cycle() {
                tick.tick().await;
                eprint!("\r{msg} {frame}");
                let _ = std::io::stderr().flush();
            }
        });
        *self.task.borrow_mut() = Some(handle);
    }

    /// Stops the animation and clears its line.
    pub fn stop(&self) {
        if let Some(handle) = self.task.borrow_mut().take() {
            handle.abort();
            eprint!("\r\x1b[2K");
            let _ = std::io::stderr().flush();
        }
    }

    /// Runs `fut` with the spinner going.
    pub async fn wrap<T>(&self, fut: impl Future<Output = T>) -> T {
        self.start();
        let out = fut.await;
        self.stop();
        out
    }
}

impl Drop for Spinner {
    fn drop(&mut self) { self.stop() }
}
