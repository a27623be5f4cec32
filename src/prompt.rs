//! User-facing side effects: confirmation, notification, survey launch
//!
//! The session logic only talks to [`UserPrompt`], so it runs the same
//! under a terminal, a script, or a test.

use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::process::Command;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Dialogs and browser launch needed by a session
pub trait UserPrompt: Send + Sync {
    /// Blocking OK/Cancel question; `true` means OK
    fn confirm(&self, message: &str) -> bool;

    /// Blocking notification
    fn notify(&self, message: &str);

    /// Open `url` in the default browser
    fn open_url(&self, url: &str) -> Result<()>;
}

/// Interactive terminal prompt
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl UserPrompt for ConsolePrompt {
    fn confirm(&self, message: &str) -> bool {
        println!("{} {}", "Start Session:".cyan().bold(), message);

        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                warn!("Cannot open terminal for confirmation: {}", e);
                return false;
            }
        };

        match editor.readline("[y/N] ") {
            Ok(line) => matches!(line.trim().to_lowercase().as_str(), "y" | "yes" | "ok"),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => false,
            Err(e) => {
                warn!("Failed to read confirmation: {}", e);
                false
            }
        }
    }

    fn notify(&self, message: &str) {
        println!("{} {}", "Time's Up!".yellow().bold(), message);
    }

    fn open_url(&self, url: &str) -> Result<()> {
        open_in_browser(url)
    }
}

/// Launch the platform opener without waiting for it
pub fn open_in_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    let mut cmd = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", "", url]);
        c
    };
    #[cfg(target_os = "macos")]
    let mut cmd = {
        let mut c = Command::new("open");
        c.arg(url);
        c
    };
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut cmd = {
        let mut c = Command::new("xdg-open");
        c.arg(url);
        c
    };

    cmd.spawn()
        .with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}

/// Non-interactive prompt: always confirms, logs everything else
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoPrompt;

impl UserPrompt for AutoPrompt {
    fn confirm(&self, message: &str) -> bool {
        info!(message, "Auto-confirming");
        true
    }

    fn notify(&self, message: &str) {
        info!(message, "Notification");
    }

    fn open_url(&self, url: &str) -> Result<()> {
        info!(url, "Survey link (not opened)");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct PromptLog {
    confirmations: Vec<String>,
    notifications: Vec<String>,
    urls: Vec<String>,
}

/// Scripted prompt that remembers what it was asked
#[derive(Debug, Clone)]
pub struct RecordingPrompt {
    answer: bool,
    log: Arc<Mutex<PromptLog>>,
}

impl RecordingPrompt {
    pub fn accepting() -> Self {
        Self::with_answer(true)
    }

    pub fn declining() -> Self {
        Self::with_answer(false)
    }

    pub fn with_answer(answer: bool) -> Self {
        Self {
            answer,
            log: Arc::new(Mutex::new(PromptLog::default())),
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.lock().confirmations.clone()
    }

    pub fn notifications(&self) -> Vec<String> {
        self.lock().notifications.clone()
    }

    pub fn opened_urls(&self) -> Vec<String> {
        self.lock().urls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PromptLog> {
        self.log.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.lock().confirmations.push(message.to_string());
        self.answer
    }

    fn notify(&self, message: &str) {
        self.lock().notifications.push(message.to_string());
    }

    fn open_url(&self, url: &str) -> Result<()> {
        self.lock().urls.push(url.to_string());
        Ok(())
    }
}
