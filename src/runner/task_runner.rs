// src/runner/task_runner.rs

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, error, warn};

use crate::errors::Result;
use crate::plugin::{Plugin, PluginTask};
use crate::runner::Runner;
use crate::types::{RunAction, TaskOutcome};
use crate::watch::path_utils::slash_str;
use crate::watch::RelativeChanges;

/// Production [`Runner`].
///
/// Plugins arrive grouped in declaration order. A failing plugin (hook
/// error or non-success outcome) halts the rest of its group when the group
/// sets `halt_on_fail = true`; otherwise the failure is logged and the walk
/// continues. Failures never propagate to the supervisor.
#[derive(Debug, Default)]
pub struct TaskRunner;

impl TaskRunner {
    pub fn new() -> Self {
        Self
    }

    fn walk<F>(&self, label: &str, plugins: &[Plugin], mut hook: F)
    where
        F: FnMut(&Plugin) -> Option<anyhow::Result<TaskOutcome>>,
    {
        let mut halted: HashSet<&str> = HashSet::new();

        for plugin in plugins {
            let group = plugin.group();
            if halted.contains(group.name()) {
                debug!(plugin = plugin.name(), group = group.name(), "group halted; skipping");
                continue;
            }

            let Some(result) = hook(plugin) else {
                continue;
            };

            let failed = match result {
                Ok(TaskOutcome::Success) => false,
                Ok(TaskOutcome::Failed(code)) => {
                    warn!(plugin = plugin.name(), group = group.name(), code, "{label} failed");
                    true
                }
                Err(err) => {
                    error!(
                        plugin = plugin.name(),
                        group = group.name(),
                        error = %err,
                        "{label} raised an error"
                    );
                    true
                }
            };

            if failed && group.halt_on_fail() {
                warn!(group = group.name(), "halting remaining plugins of group");
                halted.insert(group.name());
            }
        }
    }
}

impl Runner for TaskRunner {
    fn run(&mut self, action: RunAction, plugins: &[Plugin]) -> Result<()> {
        debug!(%action, plugins = plugins.len(), "broadcasting action");
        let label = action.to_string();
        self.walk(&label, plugins, |plugin| {
            let task = plugin.task();
            Some(match action {
                RunAction::Start => task.start(),
                RunAction::Stop => task.stop(),
                RunAction::Reload => task.reload(),
                RunAction::RunAll => task.run_all(),
            })
        });
        Ok(())
    }

    fn run_on_changes(&mut self, plugins: &[Plugin], changes: &RelativeChanges) -> Result<()> {
        self.walk("run_on_changes", plugins, |plugin| {
            let modified = matching(plugin, &changes.modified);
            let added = matching(plugin, &changes.added);
            let removed = matching(plugin, &changes.removed);
            if modified.is_empty() && added.is_empty() && removed.is_empty() {
                return None;
            }
            Some(run_change_hooks(plugin.task(), &modified, &added, &removed))
        });
        Ok(())
    }
}

/// The subset of `paths` the plugin's watch profile is interested in.
fn matching(plugin: &Plugin, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths
        .iter()
        .filter(|path| plugin.profile().matches(&slash_str(path)))
        .cloned()
        .collect()
}

/// Modifications, then additions, then removals. Empty categories are
/// skipped; the first failing hook ends the plugin's turn.
fn run_change_hooks(
    task: &dyn PluginTask,
    modified: &[PathBuf],
    added: &[PathBuf],
    removed: &[PathBuf],
) -> anyhow::Result<TaskOutcome> {
    type Hook = fn(&dyn PluginTask, &[PathBuf]) -> anyhow::Result<TaskOutcome>;
    let hooks: [(&[PathBuf], Hook); 3] = [
        (modified, |t, p| t.run_on_modifications(p)),
        (added, |t, p| t.run_on_additions(p)),
        (removed, |t, p| t.run_on_removals(p)),
    ];

    for (paths, hook) in hooks {
        if paths.is_empty() {
            continue;
        }
        let outcome = hook(task, paths)?;
        if !outcome.is_success() {
            return Ok(outcome);
        }
    }
    Ok(TaskOutcome::Success)
}
