// src/notifier/backend.rs

use tracing::{info, warn};

use crate::errors::{Result, WatchguardError};
use crate::exec;
use crate::notifier::Notifier;
use crate::plugin::OptionsTable;
use crate::types::{NotifyImage, NotifyOptions};

/// A concrete way of showing a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationBackend {
    /// Emit the message as a log event.
    Log,
    /// Print the message on stderr.
    Terminal,
    /// Run `program [args...] <title> <message>`.
    Command { program: String, args: Vec<String> },
}

impl NotificationBackend {
    /// Resolve a declared backend by name.
    pub fn from_declaration(name: &str, options: &OptionsTable) -> Result<Self> {
        match name {
            "log" => Ok(NotificationBackend::Log),
            "terminal" => Ok(NotificationBackend::Terminal),
            "command" => {
                let program = match options.get("program") {
                    Some(toml::Value::String(p)) if !p.is_empty() => p.clone(),
                    _ => {
                        return Err(anyhow::anyhow!(
                            "notification backend `command` requires a string `program` option"
                        )
                        .into());
                    }
                };
                let args: Vec<String> = match options.get("args") {
                    None => Vec::new(),
                    Some(value) => value.clone().try_into()?,
                };
                Ok(NotificationBackend::Command { program, args })
            }
            other => Err(WatchguardError::UnknownNotifier(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NotificationBackend::Log => "log",
            NotificationBackend::Terminal => "terminal",
            NotificationBackend::Command { .. } => "command",
        }
    }

    fn deliver(&self, message: &str, options: &NotifyOptions, log_commands: bool) {
        match self {
            NotificationBackend::Log => match options.image {
                NotifyImage::Failed => warn!(title = %options.title, "{message}"),
                _ => info!(title = %options.title, "{message}"),
            },
            NotificationBackend::Terminal => {
                eprintln!("[{}] {}", options.title, message);
            }
            NotificationBackend::Command { program, args } => {
                let mut argv = args.clone();
                argv.push(options.title.clone());
                argv.push(message.to_string());
                if let Err(err) = exec::system(program, &argv, log_commands) {
                    warn!(program = %program, error = %err, "notification command failed");
                }
            }
        }
    }
}

/// Production [`Notifier`]: fans messages out to the declared backends.
#[derive(Debug, Clone, Default)]
pub struct BackendNotifier {
    enabled: bool,
    backends: Vec<NotificationBackend>,
    log_commands: bool,
}

impl BackendNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log notification commands before running them.
    pub fn with_command_logging(mut self, log_commands: bool) -> Self {
        self.log_commands = log_commands;
        self
    }
}

impl Notifier for BackendNotifier {
    fn turn_on(&mut self) {
        self.enabled = true;
    }

    fn turn_off(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn notify(&self, message: &str, options: &NotifyOptions) {
        if !self.enabled {
            return;
        }
        // Without declared backends, notifications go to the log.
        if self.backends.is_empty() {
            NotificationBackend::Log.deliver(message, options, self.log_commands);
            return;
        }
        for backend in &self.backends {
            backend.deliver(message, options, self.log_commands);
        }
    }

    fn add_backend(&mut self, name: &str, options: &OptionsTable) -> Result<()> {
        let backend = NotificationBackend::from_declaration(name, options)?;
        if !self.backends.contains(&backend) {
            self.backends.push(backend);
        }
        Ok(())
    }

    fn clear_backends(&mut self) {
        self.backends.clear();
    }

    fn backend_names(&self) -> Vec<String> {
        self.backends.iter().map(|b| b.name().to_string()).collect()
    }
}
