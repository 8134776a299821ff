// src/watch/resolver.rs

//! Map absolute change paths onto the watch directory that contains them.

use std::path::{Path, PathBuf};

use crate::errors::{Result, WatchguardError};
use crate::watch::path_utils::{expand_path, relative_to};

/// Relativises absolute paths against an ordered list of watch directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResolver {
    watchdirs: Vec<PathBuf>,
}

impl PathResolver {
    pub fn new(watchdirs: Vec<PathBuf>) -> Self {
        Self { watchdirs }
    }

    pub fn watchdirs(&self) -> &[PathBuf] {
        &self.watchdirs
    }

    /// Express `path` relative to the first watch directory containing it.
    ///
    /// Fails with [`WatchguardError::RelativePath`] for relative input and
    /// with [`WatchguardError::UnwatchedPath`] when no directory contains the
    /// path. Never returns a path with `..` segments.
    pub fn relativize(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Err(WatchguardError::RelativePath(path.to_path_buf()));
        }

        let normalized = expand_path(path, Path::new("/"));
        for watchdir in &self.watchdirs {
            if let Some(rel) = relative_to(watchdir, &normalized) {
                return Ok(rel);
            }
        }

        Err(WatchguardError::UnwatchedPath {
            path: path.to_path_buf(),
            watchdirs: self.watchdirs.clone(),
        })
    }

    /// Relativise every path, preserving order and dropping duplicates.
    pub fn relativize_all<'a, I>(&self, paths: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = &'a PathBuf>,
    {
        let mut out: Vec<PathBuf> = Vec::new();
        for path in paths {
            let rel = self.relativize(path)?;
            if !out.contains(&rel) {
                out.push(rel);
            }
        }
        Ok(out)
    }
}
