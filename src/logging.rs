// src/logging.rs

//! Logging setup for `watchguard` using `tracing` + `tracing-subscriber`.
//!
//! The level comes from, in order: `--log-level`, `--debug` (forces
//! `debug`), the `WATCHGUARD_LOG` environment variable, then `info`.
//! Everything goes to stderr; plugin commands own stdout.

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "WATCHGUARD_LOG";

/// Install the global subscriber. Fails if one is already installed.
pub fn init_logging(cli_level: Option<LogLevel>, debug: bool) -> Result<()> {
    let env_level = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(cli_level, debug, env_level.as_deref());

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("initialising logging: {e}"))
}

/// Pick the effective level from the CLI flag, the debug switch and the
/// raw environment value. Unparsable environment values are ignored.
pub fn resolve_level(cli_level: Option<LogLevel>, debug: bool, env_level: Option<&str>) -> Level {
    match (cli_level, debug) {
        (Some(lvl), _) => lvl.into(),
        (None, true) => Level::DEBUG,
        (None, false) => env_level.and_then(parse_env_level).unwrap_or(Level::INFO),
    }
}

fn parse_env_level(raw: &str) -> Option<Level> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("warning") {
        return Some(Level::WARN);
    }
    raw.parse().ok()
}
