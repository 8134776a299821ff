// src/config/source.rs

//! Configuration source selection and reading.
//!
//! Selection policy, in priority order:
//! 1. inline contents (even an empty string) win outright;
//! 2. otherwise every explicitly given path becomes a required source;
//! 3. otherwise the project file (with the home file as fallback) followed
//!    by the optional user file.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use crate::config::options::Options;
use crate::errors::{Result, WatchguardError};
use crate::fs::FileSystem;
use crate::watch::path_utils::expand_path;

/// Origin label used for inline configuration in diagnostics.
pub const INLINE_ORIGIN: &str = "(inline)";

/// One origin of configuration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Inline(String),
    File(FileSource),
}

/// A configuration file, optionally backed by a fallback file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSource {
    path: PathBuf,
    fallback: Option<PathBuf>,
    optional: bool,
}

/// Text produced by reading a source, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub origin: String,
    pub text: String,
}

impl FileSource {
    /// A required file with no fallback.
    pub fn required(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
            optional: false,
        }
    }

    /// A required file that falls back to `fallback` when missing.
    pub fn with_fallback(path: impl Into<PathBuf>, fallback: Option<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback,
            optional: false,
        }
    }

    /// A file that is silently skipped when missing.
    pub fn optional(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            fallback: None,
            optional: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fallback(&self) -> Option<&Path> {
        self.fallback.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    fn read(&self, fs: &dyn FileSystem) -> Result<Option<SourceText>> {
        if let Some(text) = read_file(fs, &self.path)? {
            return Ok(Some(SourceText {
                origin: self.path.display().to_string(),
                text,
            }));
        }

        if self.optional {
            return Ok(None);
        }

        let Some(fallback) = &self.fallback else {
            let err = WatchguardError::SourceNotFound {
                path: self.path.clone(),
                has_fallback: false,
            };
            error!("{err}");
            return Err(err);
        };

        match read_file(fs, fallback)? {
            Some(text) => Ok(Some(SourceText {
                origin: fallback.display().to_string(),
                text,
            })),
            None => {
                let err = WatchguardError::SourceNotFound {
                    path: self.path.clone(),
                    has_fallback: true,
                };
                error!("{err}");
                Err(err)
            }
        }
    }
}

/// Read a file; `Ok(None)` means it does not exist. Every other failure is
/// fatal, whether or not the source is optional.
fn read_file(fs: &dyn FileSystem, path: &Path) -> Result<Option<String>> {
    info!("Using configuration at {}.", path.display());
    match fs.read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            info!("Failed to read: {}.", path.display());
            Ok(None)
        }
        Err(err) => {
            error!(path = %path.display(), error = %err, "error reading configuration file");
            Err(WatchguardError::SourceRead {
                path: path.to_path_buf(),
                source: err,
            })
        }
    }
}

impl ConfigSource {
    /// Produce the literal text of this source. `Ok(None)` means the source
    /// was optional and absent.
    pub fn read(&self, fs: &dyn FileSystem) -> Result<Option<SourceText>> {
        match self {
            ConfigSource::Inline(text) => {
                info!("Using inline configuration.");
                Ok(Some(SourceText {
                    origin: INLINE_ORIGIN.to_string(),
                    text: text.clone(),
                }))
            }
            ConfigSource::File(file) => file.read(fs),
        }
    }

    /// Whether `candidate` (after normalisation against `cwd`) is this
    /// source's primary or fallback file.
    pub fn is_source(&self, candidate: &Path, cwd: &Path) -> bool {
        match self {
            ConfigSource::Inline(_) => false,
            ConfigSource::File(file) => {
                let candidate = expand_path(candidate, cwd);
                expand_path(&file.path, cwd) == candidate
                    || file
                        .fallback
                        .as_ref()
                        .is_some_and(|fb| expand_path(fb, cwd) == candidate)
            }
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Inline(_) => f.write_str(INLINE_ORIGIN),
            ConfigSource::File(file) => write!(f, "{}", file.path.display()),
        }
    }
}

/// Inputs to source selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSelection {
    pub inline: Option<String>,
    pub explicit: Vec<PathBuf>,
    pub primary: PathBuf,
    pub fallback: Option<PathBuf>,
    pub user: Option<PathBuf>,
}

impl SourceSelection {
    pub fn from_options(options: &Options) -> Self {
        let explicit = options
            .guardfiles
            .iter()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| options.expand(p))
            .collect();

        Self {
            inline: options.guardfile_contents.clone(),
            explicit,
            primary: options.env.primary_config(),
            fallback: options.env.fallback_config(),
            user: options.env.user_config(),
        }
    }

    /// Apply the selection policy.
    pub fn select(self) -> Vec<ConfigSource> {
        if let Some(inline) = self.inline {
            return vec![ConfigSource::Inline(inline)];
        }

        if !self.explicit.is_empty() {
            return self
                .explicit
                .into_iter()
                .map(|p| ConfigSource::File(FileSource::required(p)))
                .collect();
        }

        let mut sources = vec![ConfigSource::File(FileSource::with_fallback(
            self.primary,
            self.fallback,
        ))];
        if let Some(user) = self.user {
            sources.push(ConfigSource::File(FileSource::optional(user)));
        }
        sources
    }
}

/// Resolve the ordered configuration sources for an options snapshot.
pub fn resolve_sources(options: &Options) -> Vec<ConfigSource> {
    SourceSelection::from_options(options).select()
}
