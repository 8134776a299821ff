// crates/test-utils/src/builders.rs

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use watchguard::config::{Environment, Options};

/// Builder for `Options` rooted at a fixed working directory, so tests never
/// depend on the real process environment.
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            options: Options::new(Environment::rooted_at(cwd)),
        }
    }

    /// Inline configuration text (`Some("")` is a valid empty document).
    pub fn inline(mut self, text: &str) -> Self {
        self.options.guardfile_contents = Some(text.to_string());
        self
    }

    pub fn guardfile(mut self, path: impl AsRef<Path>) -> Self {
        self.options.guardfiles.push(path.as_ref().to_path_buf());
        self
    }

    pub fn group(mut self, name: &str) -> Self {
        self.options.groups.push(name.to_string());
        self
    }

    pub fn plugin(mut self, name: &str) -> Self {
        self.options.plugins.push(name.to_string());
        self
    }

    pub fn watchdir(mut self, dir: impl AsRef<Path>) -> Self {
        self.options.watchdirs.push(dir.as_ref().to_path_buf());
        self
    }

    pub fn notify(mut self, notify: bool) -> Self {
        self.options.notify = notify;
        self
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.options.debug = debug;
        self
    }

    pub fn no_interactions(mut self) -> Self {
        self.options.no_interactions = true;
        self
    }

    /// Value of the notification kill switch variable.
    pub fn notify_switch(mut self, value: &str) -> Self {
        self.options.env.notify_switch = Some(value.to_string());
        self
    }

    pub fn home(mut self, home: impl Into<PathBuf>) -> Self {
        self.options.env.home = Some(home.into());
        self
    }

    pub fn config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.env.config_dir = Some(dir.into());
        self
    }

    pub fn latency(mut self, secs: f64) -> Self {
        self.options.listener.latency = Some(Duration::from_secs_f64(secs));
        self
    }

    pub fn force_polling(mut self) -> Self {
        self.options.listener.force_polling = true;
        self
    }

    pub fn build(self) -> Options {
        self.options
    }
}
