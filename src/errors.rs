// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchguardError {
    /// A required configuration file is missing and no fallback applies.
    #[error("{}", source_not_found_message(path, *has_fallback))]
    SourceNotFound { path: PathBuf, has_fallback: bool },

    /// Reading a configuration file failed for a reason other than absence.
    #[error("error reading file {}: {source}", path.display())]
    SourceRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document itself could not be evaluated.
    #[error("evaluating configuration failed: {origin}: {message}")]
    Evaluation { origin: String, message: String },

    #[error("unknown plugin type `{0}`")]
    UnknownPlugin(String),

    #[error("unknown notification backend `{0}`")]
    UnknownNotifier(String),

    /// A group or plugin filter names something the live model does not have.
    #[error("unknown {kind} `{name}` requested in scope")]
    ScopeResolution { kind: &'static str, name: String },

    #[error("file not watched: {} within: {watchdirs:?}", path.display())]
    UnwatchedPath {
        path: PathBuf,
        watchdirs: Vec<PathBuf>,
    },

    #[error("relative change paths are not supported: {}", .0.display())]
    RelativePath(PathBuf),

    #[error("listener error: {0}")]
    Listener(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    NotifyError(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WatchguardError {
    /// Wrap any error raised while a configuration source was being evaluated.
    pub fn evaluation(origin: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        WatchguardError::Evaluation {
            origin: origin.into(),
            message: cause.to_string(),
        }
    }

    /// Errors after which there is no configuration left worth watching:
    /// a source that vanished or cannot be read, or a scope filter that no
    /// longer names anything.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WatchguardError::SourceNotFound { .. }
                | WatchguardError::SourceRead { .. }
                | WatchguardError::ScopeResolution { .. }
        )
    }
}

fn source_not_found_message(path: &Path, has_fallback: bool) -> String {
    if has_fallback {
        format!(
            "configuration file {} not found, please create one with `watchguard --init`",
            path.display()
        )
    } else {
        format!("no configuration file exists at {}", path.display())
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchguardError>;
