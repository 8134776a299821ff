// src/supervisor/handle.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;
use tracing::{debug, error};

use crate::config::Options;
use crate::errors::{Result, WatchguardError};
use crate::interactor::console::HELP;
use crate::listener::ChangeCallback;
use crate::signals;
use crate::supervisor::{LifecycleState, Supervisor};
use crate::types::{ConsoleCommand, ControlSignal};
use crate::watch::{ChangeSet, SnapshotCell};

/// Shared owner of the one [`Supervisor`].
///
/// Every state-changing operation goes through [`SupervisorHandle::lock`],
/// so the watcher callback, signal tasks and console commands never
/// interleave their mutations. The relevance check on incoming change
/// batches reads the published [`SnapshotCell`] and does not take the lock.
#[derive(Debug, Clone)]
pub struct SupervisorHandle {
    inner: Arc<Mutex<Supervisor>>,
    snapshot: SnapshotCell,
    stopped: watch::Receiver<bool>,
    signals_installed: Arc<AtomicBool>,
}

impl SupervisorHandle {
    pub fn new(supervisor: Supervisor) -> Self {
        let snapshot = supervisor.snapshot_cell();
        let stopped = supervisor.stopped_receiver();
        Self {
            inner: Arc::new(Mutex::new(supervisor)),
            snapshot,
            stopped,
            signals_installed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Enter the critical section. A poisoned lock is recovered: the state
    /// it protects is reset on every (re)evaluation anyway.
    pub fn lock(&self) -> MutexGuard<'_, Supervisor> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Set up the supervisor and install signal handlers (once per handle).
    pub fn setup(&self, options: Options) -> Result<()> {
        let mut supervisor = self.lock();
        supervisor.prepare(options)?;
        if !self.signals_installed.swap(true, Ordering::AcqRel) && !signals::install(self) {
            self.signals_installed.store(false, Ordering::Release);
        }
        supervisor.finish_setup(self.change_callback())
    }

    /// Callback handed to the listener. Holds the supervisor weakly so a
    /// dropped handle does not stay alive through its own listener.
    pub fn change_callback(&self) -> ChangeCallback {
        let inner: Weak<Mutex<Supervisor>> = Arc::downgrade(&self.inner);
        let snapshot = self.snapshot.clone();
        let stopped = self.stopped.clone();
        let signals_installed = Arc::clone(&self.signals_installed);
        Arc::new(move |changes: ChangeSet| {
            let Some(inner) = inner.upgrade() else {
                return;
            };
            let handle = SupervisorHandle {
                inner,
                snapshot: snapshot.clone(),
                stopped: stopped.clone(),
                signals_installed: Arc::clone(&signals_installed),
            };
            handle.handle_changes(changes);
        })
    }

    /// Relevance check without the lock, then dispatch under it.
    pub fn handle_changes(&self, changes: ChangeSet) {
        match self.snapshot.load().is_relevant(&changes) {
            Ok(true) => {}
            Ok(false) => {
                debug!(?changes, "no relevant changes");
                return;
            }
            Err(err) => {
                error!("{err}");
                return;
            }
        }

        let mut supervisor = self.lock();
        if let Err(err) = supervisor.dispatch_changes(&changes) {
            settle(&mut supervisor, &err);
        }
    }

    pub fn on_signal(&self, signal: ControlSignal) {
        signals::apply_signal(&mut self.lock(), signal);
    }

    pub fn start(&self) -> Result<()> {
        self.lock().start()
    }

    pub fn reevaluate(&self) -> Result<()> {
        self.lock().reevaluate()
    }

    pub fn stop(&self) {
        self.lock().stop();
    }

    /// Execute one console command. Everything but `Help` runs under the
    /// lock.
    pub fn execute(&self, command: ConsoleCommand) {
        if command == ConsoleCommand::Help {
            // Console output for the user, not a log record.
            eprintln!("{HELP}");
            return;
        }

        let mut supervisor = self.lock();
        match command {
            ConsoleCommand::RunAll => supervisor.run_all(),
            ConsoleCommand::Reevaluate => {
                if let Err(err) = supervisor.reevaluate() {
                    settle(&mut supervisor, &err);
                }
            }
            ConsoleCommand::TogglePause => supervisor.toggle_pause(),
            ConsoleCommand::Exit => supervisor.stop(),
            ConsoleCommand::Help => {}
        }
    }

    /// Message of the error that stopped the supervisor, if one did.
    pub fn failure(&self) -> Option<String> {
        self.lock().failure().map(str::to_owned)
    }

    pub fn state(&self) -> LifecycleState {
        self.lock().state()
    }

    /// Resolve once the supervisor has stopped. Does not take the lock.
    pub async fn wait_stopped(&self) {
        let mut stopped = self.stopped.clone();
        // An error means the supervisor is gone, which is as good as stopped.
        let _ = stopped.wait_for(|stopped| *stopped).await;
    }
}

/// Log a failed reload or dispatch; fatal errors stop the supervisor.
fn settle(supervisor: &mut Supervisor, err: &WatchguardError) {
    if err.is_fatal() {
        supervisor.abort(err);
    } else {
        error!("{err}");
    }
}
