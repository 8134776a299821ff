// src/watch/filter.rs

//! Relevance check for raw change sets.
//!
//! The watcher callback runs off the main flow of control, so the check
//! works on an immutable [`FilterSnapshot`] published by the supervisor
//! after every (re)evaluation. Reading it never takes the supervisor lock
//! and never mutates anything.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use crate::config::ConfigSource;
use crate::errors::Result;
use crate::watch::changes::ChangeSet;
use crate::watch::path_utils::slash_str;
use crate::watch::patterns::{IgnoreRules, WatchProfile};
use crate::watch::resolver::PathResolver;

/// Everything the relevance predicate needs, frozen at publish time.
#[derive(Debug, Clone, Default)]
pub struct FilterSnapshot {
    resolver: PathResolver,
    sources: Vec<ConfigSource>,
    cwd: PathBuf,
    ignore: IgnoreRules,
    /// Watch profiles of the scoped plugins.
    profiles: Vec<WatchProfile>,
}

impl FilterSnapshot {
    pub fn new(
        resolver: PathResolver,
        sources: Vec<ConfigSource>,
        cwd: PathBuf,
        ignore: IgnoreRules,
        profiles: Vec<WatchProfile>,
    ) -> Self {
        Self {
            resolver,
            sources,
            cwd,
            ignore,
            profiles,
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Whether a modified path is one of the active configuration sources.
    pub fn touches_config(&self, changes: &ChangeSet) -> bool {
        changes.modified.iter().any(|path| {
            self.sources
                .iter()
                .any(|source| source.is_source(path, &self.cwd))
        })
    }

    /// Whether the change set warrants a dispatch.
    ///
    /// A modified configuration source is always relevant. Otherwise every
    /// path (modified, added, removed) that is not ignored is tested against
    /// the scoped plugins' watch patterns, stopping at the first match.
    pub fn is_relevant(&self, changes: &ChangeSet) -> Result<bool> {
        if self.touches_config(changes) {
            return Ok(true);
        }

        if self.profiles.is_empty() {
            return Ok(false);
        }

        for path in changes.all_paths() {
            let rel = slash_str(&self.resolver.relativize(path)?);
            if self.ignore.is_ignored(&rel) {
                continue;
            }
            if self.profiles.iter().any(|profile| profile.matches(&rel)) {
                return Ok(true);
            }
        }

        Ok(false)
    }
}

/// Shared slot holding the latest published snapshot.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Arc<FilterSnapshot>>>,
}

impl SnapshotCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self) -> Arc<FilterSnapshot> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }

    pub fn store(&self, snapshot: FilterSnapshot) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
    }
}
