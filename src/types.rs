// src/types.rs

use std::fmt;
use std::str::FromStr;

/// Canonical name type for groups and plugins.
pub type Name = String;

/// Broadcast actions the runner fans out to every scoped plugin.
///
/// - `Start`: plugins begin their work (issued after setup and after a
///   successful re-evaluation).
/// - `Stop`: plugins stop any running work (issued before a re-evaluation
///   and on shutdown).
/// - `Reload`: plugins reload their own state.
/// - `RunAll`: plugins run everything they know about (console request).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    Start,
    Stop,
    Reload,
    RunAll,
}

impl fmt::Display for RunAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunAction::Start => "start",
            RunAction::Stop => "stop",
            RunAction::Reload => "reload",
            RunAction::RunAll => "run_all",
        };
        f.write_str(s)
    }
}

/// Outcome of a single plugin hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

impl TaskOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success)
    }
}

/// Image hint attached to a user notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifyImage {
    #[default]
    Success,
    Pending,
    Failed,
}

/// Options passed along with a notification message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyOptions {
    pub title: String,
    pub image: NotifyImage,
}

impl NotifyOptions {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            image: NotifyImage::Success,
        }
    }

    pub fn with_image(mut self, image: NotifyImage) -> Self {
        self.image = image;
        self
    }
}

/// Control signals the process reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// `SIGUSR1`: pause the watcher.
    Pause,
    /// `SIGUSR2`: resume the watcher.
    Resume,
    /// `SIGINT`: forwarded to the console, or stops everything.
    Interrupt,
}

/// Commands typed into the interactive console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    RunAll,
    Reevaluate,
    TogglePause,
    Help,
    Exit,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(ConsoleCommand::RunAll),
            "reload" | "r" => Ok(ConsoleCommand::Reevaluate),
            "pause" | "p" => Ok(ConsoleCommand::TogglePause),
            "help" | "h" | "?" => Ok(ConsoleCommand::Help),
            "exit" | "quit" | "e" | "q" => Ok(ConsoleCommand::Exit),
            other => Err(format!(
                "unknown command: {other} (try \"help\")"
            )),
        }
    }
}
