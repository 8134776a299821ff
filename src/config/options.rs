// src/config/options.rs

//! Immutable options snapshot for one `setup` pass.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};

use crate::cli::CliArgs;

/// Name of the project-local configuration file.
pub const CONFIG_FILE_NAME: &str = "Watchguard.toml";

/// Name of the home-directory fallback configuration file.
pub const HOME_CONFIG_FILE_NAME: &str = ".Watchguard.toml";

/// Environment variable that disables notifications when set to `"false"`.
pub const NOTIFY_ENV_VAR: &str = "WATCHGUARD_NOTIFY";

/// Process environment captured once, so the rest of the crate never reads
/// ambient state directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    pub cwd: PathBuf,
    pub home: Option<PathBuf>,
    pub config_dir: Option<PathBuf>,
    /// Raw value of `WATCHGUARD_NOTIFY`, if set.
    pub notify_switch: Option<String>,
}

impl Environment {
    pub fn capture() -> Result<Self> {
        let cwd = std::env::current_dir().context("determining current directory")?;
        // Watcher events carry resolved paths, so a symlinked cwd must match.
        let cwd = std::fs::canonicalize(&cwd).unwrap_or(cwd);
        Ok(Self {
            cwd,
            home: dirs::home_dir(),
            config_dir: dirs::config_dir(),
            notify_switch: std::env::var(NOTIFY_ENV_VAR).ok(),
        })
    }

    /// An environment rooted at `cwd` with no home, no config dir and no
    /// kill switch.
    pub fn rooted_at(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            home: None,
            config_dir: None,
            notify_switch: None,
        }
    }

    /// Whether the environment kill switch forbids notifications.
    pub fn notifications_killed(&self) -> bool {
        self.notify_switch.as_deref() == Some("false")
    }

    pub fn primary_config(&self) -> PathBuf {
        self.cwd.join(CONFIG_FILE_NAME)
    }

    pub fn fallback_config(&self) -> Option<PathBuf> {
        self.home.as_ref().map(|home| home.join(HOME_CONFIG_FILE_NAME))
    }

    pub fn user_config(&self) -> Option<PathBuf> {
        self.config_dir
            .as_ref()
            .map(|dir| dir.join("watchguard").join("watchguard.toml"))
    }
}

fn seconds(secs: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(secs)
        .with_context(|| format!("{secs} is not a valid number of seconds"))
}

/// Tuning forwarded to the watcher. Unset values are never forwarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerTuning {
    pub latency: Option<Duration>,
    pub force_polling: bool,
    pub wait_for_delay: Option<Duration>,
}

/// Configuration snapshot for a single `setup` pass.
///
/// Built once and replaced wholesale on the next `setup`; nothing mutates
/// it in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub clear: bool,
    pub notify: bool,
    pub debug: bool,
    pub groups: Vec<String>,
    pub plugins: Vec<String>,
    pub watchdirs: Vec<PathBuf>,
    pub guardfiles: Vec<PathBuf>,
    /// Inline configuration. `Some("")` is a valid, empty document; `None`
    /// means "use files".
    pub guardfile_contents: Option<String>,
    pub no_interactions: bool,
    pub listener: ListenerTuning,
    pub env: Environment,
}

impl Options {
    /// Defaults for the given environment.
    pub fn new(env: Environment) -> Self {
        Self {
            clear: false,
            notify: true,
            debug: false,
            groups: Vec::new(),
            plugins: Vec::new(),
            watchdirs: Vec::new(),
            guardfiles: Vec::new(),
            guardfile_contents: None,
            no_interactions: false,
            listener: ListenerTuning::default(),
            env,
        }
    }

    pub fn from_cli(args: &CliArgs, env: Environment) -> Result<Self> {
        let mut options = Self::new(env);
        options.clear = args.clear;
        options.notify = !args.no_notify;
        options.debug = args.debug;
        options.groups = args.group.clone();
        options.plugins = args.plugin.clone();
        options.watchdirs = args.watchdir.clone();
        options.guardfiles = args.guardfile.clone();
        options.no_interactions = args.no_interactions;
        options.listener = ListenerTuning {
            latency: args.latency.map(seconds).transpose().context("invalid --latency")?,
            force_polling: args.force_polling,
            wait_for_delay: args
                .wait_for_delay
                .map(seconds)
                .transpose()
                .context("invalid --wait-for-delay")?,
        };
        Ok(options)
    }

    /// Whether the notifier should be turned on for this pass.
    ///
    /// The environment kill switch always wins over the option.
    pub fn notifications_enabled(&self) -> bool {
        self.notify && !self.env.notifications_killed()
    }

    /// Expand a possibly relative path against the captured working directory.
    pub fn expand(&self, path: &Path) -> PathBuf {
        crate::watch::path_utils::expand_path(path, &self.env.cwd)
    }
}
