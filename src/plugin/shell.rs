// src/plugin/shell.rs

//! `shell` plugin: run a command when watched files change.
//!
//! ```toml
//! [[guard]]
//! name = "shell"
//! watch = ["src/**/*.rs"]
//! cmd = "cargo test -- {files}"
//! run_on_start = true
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use crate::exec;
use crate::plugin::{bool_option, PluginSpec, PluginTask};
use crate::types::TaskOutcome;
use crate::watch::path_utils::slash_str;

pub const TYPE_NAME: &str = "shell";

/// Placeholder replaced with the matched paths.
pub const FILES_PLACEHOLDER: &str = "{files}";

#[derive(Debug, Clone)]
pub struct ShellPlugin {
    cmd: String,
    run_on_start: bool,
    run_on_removals: bool,
    log_commands: bool,
}

pub fn build(spec: &PluginSpec) -> Result<Arc<dyn PluginTask>> {
    let cmd = match spec.options.get("cmd") {
        Some(toml::Value::String(cmd)) if !cmd.trim().is_empty() => cmd.clone(),
        Some(_) => return Err(anyhow!("shell plugin option `cmd` must be a non-empty string")),
        None => return Err(anyhow!("shell plugin requires a `cmd` option")),
    };

    Ok(Arc::new(ShellPlugin {
        cmd,
        run_on_start: bool_option(&spec.options, "run_on_start")?,
        run_on_removals: bool_option(&spec.options, "run_on_removals")?,
        log_commands: spec.log_commands,
    }))
}

impl ShellPlugin {
    /// The command line for a batch of paths. Each path is quoted as one
    /// shell word.
    pub fn command_for(&self, paths: &[PathBuf]) -> String {
        let files: Vec<String> = paths.iter().map(|p| quote(&slash_str(p))).collect();
        self.cmd.replace(FILES_PLACEHOLDER, &files.join(" "))
    }

    fn execute(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        let cmd = self.command_for(paths);
        let status = exec::shell(&cmd, self.log_commands)?;
        let code = status.code().unwrap_or(-1);

        info!(cmd = %cmd, exit_code = code, success = status.success(), "shell command finished");

        if status.success() {
            Ok(TaskOutcome::Success)
        } else {
            Ok(TaskOutcome::Failed(code))
        }
    }
}

#[cfg(not(windows))]
fn quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

#[cfg(windows)]
fn quote(word: &str) -> String {
    format!("\"{}\"", word.replace('"', "\"\""))
}

impl PluginTask for ShellPlugin {
    fn start(&self) -> Result<TaskOutcome> {
        if self.run_on_start {
            self.execute(&[])
        } else {
            Ok(TaskOutcome::Success)
        }
    }

    fn run_all(&self) -> Result<TaskOutcome> {
        self.execute(&[])
    }

    fn run_on_modifications(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        self.execute(paths)
    }

    fn run_on_additions(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        self.execute(paths)
    }

    fn run_on_removals(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        if self.run_on_removals {
            self.execute(paths)
        } else {
            Ok(TaskOutcome::Success)
        }
    }
}
