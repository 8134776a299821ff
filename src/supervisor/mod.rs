// src/supervisor/mod.rs

//! The supervisor: owner of the live model and of the lifecycle.
//!
//! This module is responsible for:
//! - `setup`: resetting the model, resolving watch directories, starting the
//!   listener, evaluating the configuration and computing the scope.
//! - `reevaluate`: the stop / reset / evaluate / restart cycle.
//! - Pause, resume and stop.
//! - Dispatching relevant change batches to the runner.
//!
//! [`Supervisor`] itself is plain, single-threaded state. Concurrency lives
//! in [`SupervisorHandle`], which wraps it in a mutex and serves the watcher
//! callback, signal tasks and console commands.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{resolve_sources, ConfigSource, Options};
use crate::dsl::evaluate_text;
use crate::errors::{Result, WatchguardError};
use crate::fs::FileSystem;
use crate::interactor::{Interactor, InteractorFactory};
use crate::listener::{ChangeCallback, Listener};
use crate::model::{LiveModel, ScopeRequest};
use crate::notifier::Notifier;
use crate::plugin::{Plugin, PluginRegistry};
use crate::runner::Runner;
use crate::types::{NotifyImage, NotifyOptions, RunAction};
use crate::watch::path_utils::slash_str;
use crate::watch::{ChangeSet, FilterSnapshot, PathResolver, RelativeChanges, SnapshotCell};

pub mod handle;
mod registration;
pub mod state;

pub use handle::SupervisorHandle;
pub use state::LifecycleState;

use registration::Registration;

pub const NO_PLUGINS_MESSAGE: &str = "No plugins found in configuration, please add at least one.";
pub const REEVALUATED_MESSAGE: &str = "Configuration has been re-evaluated.";
pub const REEVALUATE_TITLE: &str = "Watchguard re-evaluate";

/// External collaborators the supervisor drives.
pub struct Collaborators {
    pub listener: Box<dyn Listener>,
    pub notifier: Box<dyn Notifier>,
    pub runner: Box<dyn Runner>,
    /// `None` disables the console for the whole process.
    pub interactor: Option<InteractorFactory>,
    pub fs: Arc<dyn FileSystem>,
    pub registry: PluginRegistry,
}

pub struct Supervisor {
    state: LifecycleState,
    options: Option<Options>,
    model: LiveModel,
    sources: Vec<ConfigSource>,
    watchdirs: Vec<PathBuf>,

    listener: Box<dyn Listener>,
    notifier: Box<dyn Notifier>,
    runner: Box<dyn Runner>,
    interactor_factory: Option<InteractorFactory>,
    interactor: Option<Box<dyn Interactor>>,
    fs: Arc<dyn FileSystem>,
    registry: PluginRegistry,

    snapshot: SnapshotCell,
    stopped: watch::Sender<bool>,
    /// Error that forced the last stop, if any.
    failure: Option<String>,
}

impl fmt::Debug for Supervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("state", &self.state)
            .field("model", &self.model)
            .field("sources", &self.sources)
            .field("watchdirs", &self.watchdirs)
            .finish_non_exhaustive()
    }
}

impl Supervisor {
    pub fn new(collaborators: Collaborators) -> Self {
        Self {
            state: LifecycleState::Uninitialized,
            options: None,
            model: LiveModel::new(),
            sources: Vec::new(),
            watchdirs: Vec::new(),
            listener: collaborators.listener,
            notifier: collaborators.notifier,
            runner: collaborators.runner,
            interactor_factory: collaborators.interactor,
            interactor: None,
            fs: collaborators.fs,
            registry: collaborators.registry,
            snapshot: SnapshotCell::new(),
            stopped: watch::Sender::new(false),
            failure: None,
        }
    }

    // --- accessors ---------------------------------------------------------

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn options(&self) -> Option<&Options> {
        self.options.as_ref()
    }

    pub fn model(&self) -> &LiveModel {
        &self.model
    }

    pub fn sources(&self) -> &[ConfigSource] {
        &self.sources
    }

    pub fn watchdirs(&self) -> &[PathBuf] {
        &self.watchdirs
    }

    pub fn is_paused(&self) -> bool {
        self.listener.is_paused()
    }

    pub fn interactor_attached(&self) -> bool {
        self.interactor.as_ref().is_some_and(|i| i.is_attached())
    }

    /// Slot the relevance predicate reads its snapshot from.
    pub fn snapshot_cell(&self) -> SnapshotCell {
        self.snapshot.clone()
    }

    /// Message of the error that stopped the supervisor, if one did.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Flips to `true` once [`Supervisor::stop`] has run.
    pub fn stopped_receiver(&self) -> watch::Receiver<bool> {
        self.stopped.subscribe()
    }

    // --- setup -------------------------------------------------------------

    /// Full setup: [`Supervisor::prepare`] then [`Supervisor::finish_setup`].
    pub fn setup(&mut self, options: Options, on_changes: ChangeCallback) -> Result<()> {
        self.prepare(options)?;
        self.finish_setup(on_changes)
    }

    /// First half of setup: take the options snapshot, reset the model and
    /// resolve the watch directories.
    pub fn prepare(&mut self, mut options: Options) -> Result<()> {
        self.state = LifecycleState::Configuring;
        self.failure = None;
        self.model.reset();
        self.sources.clear();
        // The watcher reports resolved paths; sources are derived from cwd.
        if let Ok(cwd) = self.fs.canonicalize(&options.env.cwd) {
            options.env.cwd = cwd;
        }
        self.watchdirs = resolve_watchdirs(self.fs.as_ref(), &options)?;
        debug!(watchdirs = ?self.watchdirs, "watch directories resolved");
        self.options = Some(options);
        Ok(())
    }

    /// Second half of setup: start the listener, evaluate, compute the scope
    /// and switch the notifier on or off. Ends in `Running`.
    pub fn finish_setup(&mut self, on_changes: ChangeCallback) -> Result<()> {
        let options = self.current_options()?;

        self.listener
            .start(&self.watchdirs, &options.listener, on_changes)?;

        self.configure()?;

        if options.notifications_enabled() {
            self.notifier.turn_on();
        } else {
            self.notifier.turn_off();
        }

        self.state = LifecycleState::Running;
        info!(
            groups = ?self.model.group_names(),
            plugins = ?self.model.plugin_names(),
            "setup complete"
        );
        Ok(())
    }

    /// Evaluate and compute the scope without touching any collaborator
    /// other than the notifier's backend list. Used by setup and dry runs.
    pub fn configure(&mut self) -> Result<()> {
        let result = self.evaluate().and_then(|()| self.apply_scope());
        self.publish_snapshot();
        result
    }

    /// Resolve the configuration sources and evaluate each in order.
    ///
    /// An empty plugin set afterwards is reported, not raised.
    pub fn evaluate(&mut self) -> Result<()> {
        let options = self.current_options()?;
        self.sources = resolve_sources(&options);

        for source in &self.sources {
            let Some(text) = source.read(self.fs.as_ref())? else {
                continue;
            };
            let mut registration = Registration {
                model: &mut self.model,
                notifier: self.notifier.as_mut(),
                registry: &self.registry,
                log_commands: options.debug,
            };
            evaluate_text(&text.text, &text.origin, &mut registration)?;
        }

        if self.model.plugins().is_empty() {
            error!("{NO_PLUGINS_MESSAGE}");
        }
        Ok(())
    }

    /// Compute the scope. Command-line filters win; without them the
    /// configuration's `scope` directive applies.
    fn apply_scope(&mut self) -> Result<()> {
        let options = self.current_options()?;
        let request = if options.groups.is_empty() && options.plugins.is_empty() {
            self.model.declared_scope().clone()
        } else {
            ScopeRequest {
                groups: options.groups.clone(),
                plugins: options.plugins.clone(),
            }
        };

        let scope = self.model.resolve_scope(&request)?;
        if !scope.is_empty() {
            info!(
                groups = ?scope.group_names(),
                plugins = ?scope.plugin_names(),
                "scope restricted"
            );
        }
        self.model.set_scope(scope);
        Ok(())
    }

    fn current_options(&self) -> Result<Options> {
        self.options
            .clone()
            .context("supervisor has not been set up")
            .map_err(Into::into)
    }

    fn publish_snapshot(&self) {
        let cwd = self
            .options
            .as_ref()
            .map(|o| o.env.cwd.clone())
            .unwrap_or_default();
        let profiles = self
            .model
            .scoped_plugins()
            .iter()
            .map(|p| p.profile().clone())
            .collect();
        self.snapshot.store(FilterSnapshot::new(
            PathResolver::new(self.watchdirs.clone()),
            self.sources.clone(),
            cwd,
            self.model.ignore().clone(),
            profiles,
        ));
    }

    // --- lifecycle ---------------------------------------------------------

    /// Broadcast `Start` and attach the console, if one is allowed.
    pub fn start(&mut self) -> Result<()> {
        self.broadcast(RunAction::Start);
        self.attach_interactor();
        Ok(())
    }

    /// Stop, reset, evaluate and restart.
    ///
    /// A failing stop broadcast never prevents the reset. When the new
    /// configuration has no plugins, or evaluating it fails, a failure
    /// notification is sent and nothing is restarted.
    pub fn reevaluate(&mut self) -> Result<()> {
        let notify_was_on = self.notifier.is_enabled();

        self.broadcast(RunAction::Stop);

        self.model.reset_groups();
        self.model.reset_plugins();
        self.model.reset_scope();
        self.notifier.clear_backends();

        let result = self.configure();

        if notify_was_on {
            self.notifier.turn_on();
        }

        let failure = NotifyOptions::titled(REEVALUATE_TITLE).with_image(NotifyImage::Failed);
        if let Err(err) = result {
            self.notifier
                .notify(&format!("Failed to re-evaluate configuration: {err}"), &failure);
            return Err(err);
        }

        if self.model.plugins().is_empty() {
            self.notifier.notify(NO_PLUGINS_MESSAGE, &failure);
            return Ok(());
        }

        info!("{REEVALUATED_MESSAGE}");
        self.notifier
            .notify(REEVALUATED_MESSAGE, &NotifyOptions::titled(REEVALUATE_TITLE));
        self.broadcast(RunAction::Start);
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.listener.is_paused() {
            return;
        }
        self.listener.pause();
        if self.state == LifecycleState::Running {
            self.state = LifecycleState::Paused;
        }
        info!("File event handling has been paused");
    }

    pub fn resume(&mut self) {
        if !self.listener.is_paused() {
            return;
        }
        self.listener.resume();
        if self.state == LifecycleState::Paused {
            self.state = LifecycleState::Running;
        }
        info!("File event handling has been resumed");
    }

    pub fn toggle_pause(&mut self) {
        if self.listener.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
    }

    pub fn run_all(&mut self) {
        self.clear_screen();
        self.broadcast(RunAction::RunAll);
    }

    /// Stop every plugin, detach the listener and the console. Terminal.
    pub fn stop(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        self.broadcast(RunAction::Stop);
        self.listener.stop();
        if let Some(interactor) = self.interactor.as_mut() {
            interactor.stop();
        }
        self.state = LifecycleState::Stopped;
        info!("Bye bye...");
        self.stopped.send_replace(true);
    }

    /// Stop because `err` leaves nothing valid to supervise. The message is
    /// kept for [`Supervisor::failure`].
    pub fn abort(&mut self, err: &WatchguardError) {
        error!("{err}");
        self.failure = Some(err.to_string());
        self.stop();
    }

    /// Forward an interrupt to the attached console. Returns `false` when no
    /// console is attached.
    pub fn interrupt_interactor(&mut self) -> bool {
        match self.interactor.as_mut() {
            Some(interactor) if interactor.is_attached() => {
                interactor.interrupt();
                true
            }
            _ => false,
        }
    }

    /// Whether `path` is one of the active configuration sources.
    pub fn is_source(&self, path: &Path) -> bool {
        let Some(options) = self.options.as_ref() else {
            return false;
        };
        self.sources
            .iter()
            .any(|source| source.is_source(path, &options.env.cwd))
    }

    /// Act on a change batch already judged relevant.
    ///
    /// A modified configuration source re-evaluates first. The batch is then
    /// relativised, stripped of ignored paths and handed to the runner.
    pub fn dispatch_changes(&mut self, changes: &ChangeSet) -> Result<()> {
        if !self.state.is_active() {
            debug!(state = %self.state, "not running; dropping change batch");
            return Ok(());
        }

        if changes.modified.iter().any(|path| self.is_source(path)) {
            info!("configuration changed; re-evaluating");
            self.reevaluate()?;
        }

        let resolver = PathResolver::new(self.watchdirs.clone());
        let relative = self.without_ignored(changes.relativize(&resolver)?);
        if relative.is_empty() {
            return Ok(());
        }

        let plugins = self.model.scoped_plugins();
        if plugins.is_empty() {
            return Ok(());
        }

        self.clear_screen();
        self.runner.run_on_changes(&plugins, &relative)
    }

    // --- helpers -----------------------------------------------------------

    fn broadcast(&mut self, action: RunAction) {
        let plugins: Vec<Plugin> = self.model.scoped_plugins();
        if let Err(err) = self.runner.run(action, &plugins) {
            warn!(%action, error = %err, "broadcast failed");
        }
    }

    fn attach_interactor(&mut self) {
        let disabled = self.options.as_ref().is_none_or(|o| o.no_interactions);
        if disabled || !self.model.interactor_enabled() {
            return;
        }
        if self.interactor.is_none() {
            self.interactor = self.interactor_factory.as_mut().map(|factory| factory());
        }
        if let Some(interactor) = self.interactor.as_mut() {
            if let Err(err) = interactor.start() {
                warn!(error = %err, "could not start the console");
            }
        }
    }

    fn without_ignored(&self, changes: RelativeChanges) -> RelativeChanges {
        let ignore = self.model.ignore();
        if ignore.is_empty() {
            return changes;
        }
        let keep = |paths: Vec<PathBuf>| -> Vec<PathBuf> {
            paths
                .into_iter()
                .filter(|p| !ignore.is_ignored(&slash_str(p)))
                .collect()
        };
        RelativeChanges {
            modified: keep(changes.modified),
            added: keep(changes.added),
            removed: keep(changes.removed),
        }
    }

    fn clear_screen(&self) {
        if self.options.as_ref().is_some_and(|o| o.clear) {
            print!("\x1B[2J\x1B[1;1H");
        }
    }
}

/// Absolute, canonical watch directories. Defaults to the working directory.
fn resolve_watchdirs(fs: &dyn FileSystem, options: &Options) -> Result<Vec<PathBuf>> {
    let requested: Vec<PathBuf> = if options.watchdirs.is_empty() {
        vec![options.env.cwd.clone()]
    } else {
        options.watchdirs.iter().map(|d| options.expand(d)).collect()
    };

    let mut watchdirs = Vec::with_capacity(requested.len());
    for dir in requested {
        let canonical = fs
            .canonicalize(&dir)
            .with_context(|| format!("watch directory {} is not accessible", dir.display()))?;
        if !watchdirs.contains(&canonical) {
            watchdirs.push(canonical);
        }
    }
    Ok(watchdirs)
}
