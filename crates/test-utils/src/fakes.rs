// crates/test-utils/src/fakes.rs

#![allow(dead_code)]

//! Recording fakes for the supervisor's collaborators.
//!
//! Every fake is cheap to clone and shares its state between clones, so a
//! test keeps one clone for assertions while the supervisor owns another.
//! All fakes can write into a shared [`Journal`] to assert cross-collaborator
//! ordering.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use watchguard::config::ListenerTuning;
use watchguard::errors::Result;
use watchguard::fs::FileSystem;
use watchguard::fs::mock::MockFileSystem;
use watchguard::interactor::{Interactor, InteractorFactory};
use watchguard::listener::{ChangeCallback, Listener};
use watchguard::notifier::Notifier;
use watchguard::plugin::{OptionsTable, Plugin, PluginRegistry};
use watchguard::runner::Runner;
use watchguard::supervisor::{Collaborators, Supervisor, SupervisorHandle};
use watchguard::types::{NotifyOptions, RunAction};
use watchguard::watch::{ChangeSet, RelativeChanges};

/// Ordered log of collaborator calls, e.g. `"runner:stop"`.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Entries starting with `prefix`, in order.
    pub fn filtered(&self, prefix: &str) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(prefix))
            .collect()
    }
}

// --- runner ------------------------------------------------------------------

#[derive(Debug, Default)]
struct RunnerState {
    runs: Vec<(RunAction, Vec<String>)>,
    changes: Vec<RelativeChanges>,
    fail_on: Option<RunAction>,
    delay: Option<Duration>,
}

/// Runner that records broadcasts instead of running plugins.
///
/// It also counts calls that overlap in time, which must never happen while
/// the supervisor serialises its operations.
#[derive(Debug, Clone, Default)]
pub struct RecordingRunner {
    journal: Journal,
    state: Arc<Mutex<RunnerState>>,
    in_flight: Arc<AtomicUsize>,
    overlaps: Arc<AtomicUsize>,
}

impl RecordingRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Make every broadcast of `action` return an error.
    pub fn fail_on(&self, action: RunAction) {
        self.state.lock().unwrap().fail_on = Some(action);
    }

    /// Sleep inside every call, to widen race windows.
    pub fn with_delay(&self, delay: Duration) {
        self.state.lock().unwrap().delay = Some(delay);
    }

    pub fn runs(&self) -> Vec<(RunAction, Vec<String>)> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn actions(&self) -> Vec<RunAction> {
        self.runs().into_iter().map(|(action, _)| action).collect()
    }

    pub fn changes(&self) -> Vec<RelativeChanges> {
        self.state.lock().unwrap().changes.clone()
    }

    pub fn overlaps(&self) -> usize {
        self.overlaps.load(Ordering::SeqCst)
    }

    fn enter(&self) {
        if self.in_flight.fetch_add(1, Ordering::SeqCst) > 0 {
            self.overlaps.fetch_add(1, Ordering::SeqCst);
        }
        let delay = self.state.lock().unwrap().delay;
        if let Some(delay) = delay {
            std::thread::sleep(delay);
        }
    }

    fn exit(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Runner for RecordingRunner {
    fn run(&mut self, action: RunAction, plugins: &[Plugin]) -> Result<()> {
        self.enter();
        self.journal.record(format!("runner:{action}"));
        let names = plugins.iter().map(|p| p.name().to_string()).collect();
        let fail = {
            let mut state = self.state.lock().unwrap();
            state.runs.push((action, names));
            state.fail_on == Some(action)
        };
        self.exit();
        if fail {
            return Err(anyhow::anyhow!("{action} broadcast failed").into());
        }
        Ok(())
    }

    fn run_on_changes(&mut self, _plugins: &[Plugin], changes: &RelativeChanges) -> Result<()> {
        self.enter();
        self.journal.record("runner:run_on_changes");
        self.state.lock().unwrap().changes.push(changes.clone());
        self.exit();
        Ok(())
    }
}

// --- notifier ----------------------------------------------------------------

#[derive(Debug, Default)]
struct NotifierState {
    enabled: bool,
    backends: Vec<String>,
    notifications: Vec<(String, NotifyOptions)>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    journal: Journal,
    state: Arc<Mutex<NotifierState>>,
}

impl RecordingNotifier {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn enabled(&self) -> bool {
        self.state.lock().unwrap().enabled
    }

    pub fn backends(&self) -> Vec<String> {
        self.state.lock().unwrap().backends.clone()
    }

    pub fn notifications(&self) -> Vec<(String, NotifyOptions)> {
        self.state.lock().unwrap().notifications.clone()
    }
}

impl Notifier for RecordingNotifier {
    fn turn_on(&mut self) {
        self.journal.record("notifier:turn_on");
        self.state.lock().unwrap().enabled = true;
    }

    fn turn_off(&mut self) {
        self.journal.record("notifier:turn_off");
        self.state.lock().unwrap().enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled()
    }

    fn notify(&self, message: &str, options: &NotifyOptions) {
        let mut state = self.state.lock().unwrap();
        if !state.enabled {
            return;
        }
        self.journal.record("notifier:notify");
        state
            .notifications
            .push((message.to_string(), options.clone()));
    }

    fn add_backend(&mut self, name: &str, _options: &OptionsTable) -> Result<()> {
        self.journal.record(format!("notifier:add_backend:{name}"));
        self.state.lock().unwrap().backends.push(name.to_string());
        Ok(())
    }

    fn clear_backends(&mut self) {
        self.journal.record("notifier:clear_backends");
        self.state.lock().unwrap().backends.clear();
    }

    fn backend_names(&self) -> Vec<String> {
        self.backends()
    }
}

// --- listener ----------------------------------------------------------------

#[derive(Default)]
struct ListenerState {
    watchdirs: Vec<PathBuf>,
    tuning: Option<ListenerTuning>,
    callback: Option<ChangeCallback>,
    paused: bool,
    starts: usize,
}

/// Listener whose changes are injected by the test through [`FakeListener::emit`].
#[derive(Clone, Default)]
pub struct FakeListener {
    journal: Journal,
    state: Arc<Mutex<ListenerState>>,
}

impl std::fmt::Debug for FakeListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeListener").finish_non_exhaustive()
    }
}

impl FakeListener {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    pub fn is_started(&self) -> bool {
        self.state.lock().unwrap().callback.is_some()
    }

    pub fn starts(&self) -> usize {
        self.state.lock().unwrap().starts
    }

    pub fn watchdirs(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().watchdirs.clone()
    }

    pub fn tuning(&self) -> Option<ListenerTuning> {
        self.state.lock().unwrap().tuning
    }

    /// Deliver a change batch the way the real listener would: dropped
    /// while paused or stopped, otherwise passed to the callback on the
    /// calling thread.
    pub fn emit(&self, changes: ChangeSet) {
        let callback = {
            let state = self.state.lock().unwrap();
            if state.paused {
                return;
            }
            state.callback.clone()
        };
        if let Some(callback) = callback {
            callback(changes);
        }
    }
}

impl Listener for FakeListener {
    fn start(
        &mut self,
        watchdirs: &[PathBuf],
        tuning: &ListenerTuning,
        on_changes: ChangeCallback,
    ) -> Result<()> {
        self.journal.record("listener:start");
        let mut state = self.state.lock().unwrap();
        state.watchdirs = watchdirs.to_vec();
        state.tuning = Some(*tuning);
        state.callback = Some(on_changes);
        state.paused = false;
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.journal.record("listener:stop");
        self.state.lock().unwrap().callback = None;
    }

    fn pause(&mut self) {
        self.journal.record("listener:pause");
        self.state.lock().unwrap().paused = true;
    }

    fn resume(&mut self) {
        self.journal.record("listener:resume");
        self.state.lock().unwrap().paused = false;
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }
}

// --- interactor --------------------------------------------------------------

#[derive(Debug, Default)]
struct InteractorState {
    attached: bool,
    starts: usize,
    interrupts: usize,
    created: usize,
}

#[derive(Debug, Clone, Default)]
pub struct FakeInteractor {
    state: Arc<Mutex<InteractorState>>,
}

impl FakeInteractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory handing out clones of this fake, counting creations.
    pub fn factory(&self) -> InteractorFactory {
        let fake = self.clone();
        Box::new(move || {
            fake.state.lock().unwrap().created += 1;
            Box::new(fake.clone()) as Box<dyn Interactor>
        })
    }

    pub fn attached(&self) -> bool {
        self.state.lock().unwrap().attached
    }

    pub fn starts(&self) -> usize {
        self.state.lock().unwrap().starts
    }

    pub fn interrupts(&self) -> usize {
        self.state.lock().unwrap().interrupts
    }

    pub fn created(&self) -> usize {
        self.state.lock().unwrap().created
    }
}

impl Interactor for FakeInteractor {
    fn start(&mut self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.attached = true;
        state.starts += 1;
        Ok(())
    }

    fn stop(&mut self) {
        self.state.lock().unwrap().attached = false;
    }

    fn is_attached(&self) -> bool {
        self.attached()
    }

    fn interrupt(&mut self) {
        self.state.lock().unwrap().interrupts += 1;
    }
}

// --- filesystem --------------------------------------------------------------

/// [`MockFileSystem`] that also journals reads as `"fs:read:<path>"`.
#[derive(Debug, Clone)]
pub struct JournalFs {
    pub inner: MockFileSystem,
    journal: Journal,
}

impl JournalFs {
    pub fn new(inner: MockFileSystem, journal: Journal) -> Self {
        Self { inner, journal }
    }
}

impl FileSystem for JournalFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.journal.record(format!("fs:read:{}", path.display()));
        self.inner.read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> anyhow::Result<()> {
        self.inner.write(path, contents)
    }

    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.inner.canonicalize(path)
    }
}

// --- harness -----------------------------------------------------------------

/// A full set of fakes around an in-memory filesystem whose working
/// directory already exists.
#[derive(Debug, Clone)]
pub struct Harness {
    pub cwd: PathBuf,
    pub journal: Journal,
    pub fs: MockFileSystem,
    pub runner: RecordingRunner,
    pub notifier: RecordingNotifier,
    pub listener: FakeListener,
    pub interactor: FakeInteractor,
}

impl Harness {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        let cwd = cwd.into();
        let journal = Journal::new();
        let fs = MockFileSystem::new();
        fs.add_dir(&cwd);
        Self {
            runner: RecordingRunner::new(journal.clone()),
            notifier: RecordingNotifier::new(journal.clone()),
            listener: FakeListener::new(journal.clone()),
            interactor: FakeInteractor::new(),
            cwd,
            journal,
            fs,
        }
    }

    /// Write a file relative to the working directory.
    pub fn write(&self, rel: &str, contents: &str) -> PathBuf {
        let path = self.cwd.join(rel);
        self.fs.add_file(&path, contents);
        path
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            listener: Box::new(self.listener.clone()),
            notifier: Box::new(self.notifier.clone()),
            runner: Box::new(self.runner.clone()),
            interactor: Some(self.interactor.factory()),
            fs: Arc::new(JournalFs::new(self.fs.clone(), self.journal.clone())),
            registry: PluginRegistry::builtin(),
        }
    }

    pub fn supervisor(&self) -> Supervisor {
        Supervisor::new(self.collaborators())
    }

    pub fn handle(&self) -> SupervisorHandle {
        SupervisorHandle::new(self.supervisor())
    }
}
