// src/watch/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::RegexSet;

/// Compiled watch/exclude glob patterns for a single plugin.
///
/// The patterns are relative to whichever watch directory a change came
/// from; callers pass `/`-separated relative paths (e.g. `"src/main.rs"`)
/// into `matches`.
#[derive(Clone)]
pub struct WatchProfile {
    watch: Vec<String>,
    exclude: Vec<String>,
    watch_set: GlobSet,
    exclude_set: Option<GlobSet>,
}

impl fmt::Debug for WatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchProfile")
            .field("watch", &self.watch)
            .field("exclude", &self.exclude)
            .finish_non_exhaustive()
    }
}

impl WatchProfile {
    /// Compile a profile. A profile without watch patterns matches nothing.
    pub fn new(watch: &[String], exclude: &[String]) -> Result<Self> {
        let watch_set = build_globset(watch).context("building watch globset")?;

        let exclude_set = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            watch: watch.to_vec(),
            exclude: exclude.to_vec(),
            watch_set,
            exclude_set,
        })
    }

    pub fn watch_patterns(&self) -> &[String] {
        &self.watch
    }

    /// Returns true if the plugin is interested in the given relative path.
    pub fn matches(&self, rel_path: &str) -> bool {
        if !self.watch_set.is_match(rel_path) {
            return false;
        }
        if let Some(exclude) = &self.exclude_set {
            if exclude.is_match(rel_path) {
                return false;
            }
        }
        true
    }
}

/// Global ignore rules declared with the `ignore` directive.
#[derive(Debug, Clone)]
pub struct IgnoreRules {
    set: RegexSet,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            set: RegexSet::empty(),
        }
    }
}

impl IgnoreRules {
    pub fn new(patterns: &[String]) -> Result<Self> {
        let set = RegexSet::new(patterns)
            .with_context(|| format!("invalid ignore pattern in {patterns:?}"))?;
        Ok(Self { set })
    }

    /// Combine with more patterns (directives accumulate across sources).
    pub fn extend(&self, patterns: &[String]) -> Result<Self> {
        let mut all: Vec<String> = self.set.patterns().to_vec();
        all.extend(patterns.iter().cloned());
        Self::new(&all)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_ignored(&self, rel_path: &str) -> bool {
        self.set.is_match(rel_path)
    }
}

/// Build a GlobSet from simple string patterns.
fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
