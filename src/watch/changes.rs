// src/watch/changes.rs

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::errors::Result;
use crate::watch::resolver::PathResolver;

/// One batch of raw filesystem changes, as absolute paths.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub modified: BTreeSet<PathBuf>,
    pub added: BTreeSet<PathBuf>,
    pub removed: BTreeSet<PathBuf>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modified<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.modified.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn added<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.added.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn removed<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.removed.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }

    /// Fold another batch into this one.
    pub fn merge(&mut self, other: ChangeSet) {
        self.modified.extend(other.modified);
        self.added.extend(other.added);
        self.removed.extend(other.removed);
    }

    /// Every path in the set: modified, then added, then removed.
    pub fn all_paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.modified
            .iter()
            .chain(self.added.iter())
            .chain(self.removed.iter())
    }

    /// Relativise all three collections against the watch directories.
    pub fn relativize(&self, resolver: &PathResolver) -> Result<RelativeChanges> {
        Ok(RelativeChanges {
            modified: resolver.relativize_all(&self.modified)?,
            added: resolver.relativize_all(&self.added)?,
            removed: resolver.relativize_all(&self.removed)?,
        })
    }
}

/// A change set relative to the watch directories; what plugins see.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelativeChanges {
    pub modified: Vec<PathBuf>,
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl RelativeChanges {
    pub fn is_empty(&self) -> bool {
        self.modified.is_empty() && self.added.is_empty() && self.removed.is_empty()
    }
}
