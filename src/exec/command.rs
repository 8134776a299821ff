// src/exec/command.rs

//! The only places that spawn external processes.
//!
//! `log_commands` is decided by the caller (it follows the `debug` option);
//! when set, the command line is logged before it runs.

use std::process::{Command, ExitStatus};

use anyhow::{Context, Result};
use tracing::debug;

/// Run `cmd` through the platform shell and wait for it.
pub fn shell(cmd: &str, log_commands: bool) -> Result<ExitStatus> {
    // Build a shell command appropriate for the platform.
    let mut command = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    };

    if log_commands {
        debug!("command execution: {cmd}");
    }

    command
        .status()
        .with_context(|| format!("running shell command `{cmd}`"))
}

/// Run `program` with `args` directly (no shell) and wait for it.
pub fn system(program: &str, args: &[String], log_commands: bool) -> Result<ExitStatus> {
    if log_commands {
        debug!("command execution: {} {}", program, args.join(" "));
    }

    Command::new(program)
        .args(args)
        .status()
        .with_context(|| format!("running `{program}`"))
}
