// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `watchguard`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "watchguard",
    version,
    about = "Watch files and run the tasks configured in Watchguard.toml.",
    long_about = None
)]
pub struct CliArgs {
    /// Clear the terminal before every run.
    #[arg(short, long)]
    pub clear: bool,

    /// Disable notifications.
    #[arg(short = 'n', long)]
    pub no_notify: bool,

    /// Log every external command before it runs (implies debug logging).
    #[arg(short, long)]
    pub debug: bool,

    /// Only run plugins of this group. Repeatable.
    #[arg(short, long, value_name = "NAME")]
    pub group: Vec<String>,

    /// Only run plugins of this type. Repeatable.
    #[arg(short = 'P', long, value_name = "NAME")]
    pub plugin: Vec<String>,

    /// Directory to watch instead of the current one. Repeatable.
    #[arg(short, long, value_name = "DIR")]
    pub watchdir: Vec<PathBuf>,

    /// Configuration file to use instead of the default lookup. Repeatable.
    #[arg(short = 'G', long, value_name = "PATH")]
    pub guardfile: Vec<PathBuf>,

    /// Do not start the interactive console.
    #[arg(short = 'i', long)]
    pub no_interactions: bool,

    /// Poll interval in seconds when polling.
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub latency: Option<f64>,

    /// Poll the filesystem instead of using native events.
    #[arg(short = 'p', long)]
    pub force_polling: bool,

    /// Seconds to collect events into one batch.
    #[arg(short = 'y', long, value_name = "SECONDS", value_parser = parse_seconds)]
    pub wait_for_delay: Option<f64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug`, `WATCHGUARD_LOG` or a default level is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Evaluate the configuration and print it, without watching anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Write a starter Watchguard.toml into the current directory.
    #[arg(long)]
    pub init: bool,
}

/// Parse a non-negative, finite number of seconds.
fn parse_seconds(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw.parse().map_err(|_| format!("`{raw}` is not a number"))?;
    if !secs.is_finite() || secs < 0.0 {
        return Err(format!("`{raw}` must be a non-negative, finite number of seconds"));
    }
    Ok(secs)
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
