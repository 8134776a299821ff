// src/plugin/mod.rs

//! Plugins: the configured units of watched behaviour.
//!
//! - [`registry`] maps a plugin type name to its factory.
//! - [`shell`] and [`log`] are the built-in plugin types.
//!
//! The supervisor never calls plugins directly; the runner fans broadcasts
//! out over the scoped plugins through the [`PluginTask`] contract.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::model::Group;
use crate::types::{Name, TaskOutcome};
use crate::watch::WatchProfile;

pub mod log;
pub mod registry;
pub mod shell;

pub use registry::{PluginFactory, PluginRegistry};

/// Options mapping of a plugin or group, as declared.
pub type OptionsTable = toml::Table;

/// Uniform callback contract every plugin type implements.
///
/// All hooks default to a successful no-op.
pub trait PluginTask: Send + Sync + fmt::Debug {
    fn start(&self) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn stop(&self) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn reload(&self) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn run_all(&self) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn run_on_modifications(&self, _paths: &[PathBuf]) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn run_on_additions(&self, _paths: &[PathBuf]) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }

    fn run_on_removals(&self, _paths: &[PathBuf]) -> Result<TaskOutcome> {
        Ok(TaskOutcome::Success)
    }
}

/// What a factory receives when a plugin is declared.
#[derive(Debug, Clone)]
pub struct PluginSpec {
    pub name: Name,
    pub options: OptionsTable,
    /// Log external commands before running them (debug mode).
    pub log_commands: bool,
}

/// A declared plugin in the live model.
#[derive(Clone)]
pub struct Plugin {
    name: Name,
    group: Group,
    options: OptionsTable,
    profile: WatchProfile,
    task: Arc<dyn PluginTask>,
}

impl fmt::Debug for Plugin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plugin")
            .field("name", &self.name)
            .field("group", &self.group.name())
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

impl Plugin {
    pub fn new(
        name: impl Into<Name>,
        group: Group,
        options: OptionsTable,
        profile: WatchProfile,
        task: Arc<dyn PluginTask>,
    ) -> Self {
        Self {
            name: name.into(),
            group,
            options,
            profile,
            task,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &Group {
        &self.group
    }

    pub fn options(&self) -> &OptionsTable {
        &self.options
    }

    pub fn profile(&self) -> &WatchProfile {
        &self.profile
    }

    pub fn task(&self) -> &dyn PluginTask {
        self.task.as_ref()
    }
}

/// Read an optional boolean option, rejecting values of the wrong type.
pub(crate) fn bool_option(options: &OptionsTable, key: &str) -> Result<bool> {
    match options.get(key) {
        None => Ok(false),
        Some(toml::Value::Boolean(b)) => Ok(*b),
        Some(other) => anyhow::bail!("option `{key}` must be a boolean, got {}", other.type_str()),
    }
}
