// src/plugin/log.rs

//! `log` plugin: report matched changes without running anything.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::plugin::{PluginSpec, PluginTask};
use crate::types::TaskOutcome;

pub const TYPE_NAME: &str = "log";

#[derive(Debug, Clone, Default)]
pub struct LogPlugin;

pub fn build(_spec: &PluginSpec) -> Result<Arc<dyn PluginTask>> {
    Ok(Arc::new(LogPlugin))
}

impl PluginTask for LogPlugin {
    fn run_on_modifications(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        info!(?paths, "modified");
        Ok(TaskOutcome::Success)
    }

    fn run_on_additions(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        info!(?paths, "added");
        Ok(TaskOutcome::Success)
    }

    fn run_on_removals(&self, paths: &[PathBuf]) -> Result<TaskOutcome> {
        info!(?paths, "removed");
        Ok(TaskOutcome::Success)
    }
}
