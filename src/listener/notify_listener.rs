// src/listener/notify_listener.rs

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Config, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::config::ListenerTuning;
use crate::errors::{Result, WatchguardError};
use crate::listener::{ChangeCallback, Listener};
use crate::watch::ChangeSet;

/// How long raw events are collected into one batch when `wait_for_delay`
/// is not set.
pub const DEFAULT_WAIT_FOR_DELAY: Duration = Duration::from_millis(100);

/// [`Listener`] backed by the `notify` crate.
///
/// The notify watcher pushes raw events into a channel; a dedicated worker
/// thread batches them into [`ChangeSet`]s and invokes the change callback.
pub struct NotifyListener {
    watcher: Option<Box<dyn Watcher + Send>>,
    paused: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
}

impl std::fmt::Debug for NotifyListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyListener")
            .field("started", &self.watcher.is_some())
            .field("paused", &self.is_paused())
            .finish()
    }
}

impl Default for NotifyListener {
    fn default() -> Self {
        Self::new()
    }
}

impl NotifyListener {
    pub fn new() -> Self {
        Self {
            watcher: None,
            paused: Arc::new(AtomicBool::new(false)),
            running: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Listener for NotifyListener {
    fn start(
        &mut self,
        watchdirs: &[PathBuf],
        tuning: &ListenerTuning,
        on_changes: ChangeCallback,
    ) -> Result<()> {
        self.stop();

        let (event_tx, event_rx) = mpsc::channel::<notify::Result<Event>>();

        let mut watcher: Box<dyn Watcher + Send> = if tuning.force_polling {
            let mut config = Config::default();
            if let Some(latency) = tuning.latency {
                config = config.with_poll_interval(latency);
            }
            Box::new(PollWatcher::new(event_tx, config)?)
        } else {
            Box::new(RecommendedWatcher::new(event_tx, Config::default())?)
        };

        for dir in watchdirs {
            watcher.watch(dir, RecursiveMode::Recursive)?;
        }

        let running = Arc::new(AtomicBool::new(true));
        self.running = Arc::clone(&running);
        self.paused.store(false, Ordering::Release);

        let paused = Arc::clone(&self.paused);
        let delay = tuning.wait_for_delay.unwrap_or(DEFAULT_WAIT_FOR_DELAY);

        // The worker is detached: it may be blocked on the supervisor lock
        // while the supervisor itself is stopping this listener.
        thread::Builder::new()
            .name("watchguard-listener".to_string())
            .spawn(move || worker_loop(event_rx, delay, paused, running, on_changes))
            .map_err(|e| WatchguardError::Listener(format!("failed to spawn listener thread: {e}")))?;

        info!(?watchdirs, polling = tuning.force_polling, "file watcher started");
        self.watcher = Some(watcher);
        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if self.watcher.take().is_some() {
            info!("file watcher stopped");
        }
    }

    fn pause(&mut self) {
        if !self.paused.swap(true, Ordering::AcqRel) {
            info!("file watcher paused");
        }
    }

    fn resume(&mut self) {
        if self.paused.swap(false, Ordering::AcqRel) {
            info!("file watcher resumed");
        }
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

fn worker_loop(
    event_rx: Receiver<notify::Result<Event>>,
    delay: Duration,
    paused: Arc<AtomicBool>,
    running: Arc<AtomicBool>,
    on_changes: ChangeCallback,
) {
    // The channel disconnects once the notify watcher is dropped.
    while let Ok(first) = event_rx.recv() {
        let mut batch = ChangeSet::new();
        absorb_result(&mut batch, first);

        let deadline = Instant::now() + delay;
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            match event_rx.recv_timeout(deadline - now) {
                Ok(res) => absorb_result(&mut batch, res),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        if !running.load(Ordering::Acquire) {
            break;
        }
        if paused.load(Ordering::Acquire) {
            debug!("listener paused; dropping change batch");
            continue;
        }
        if batch.is_empty() {
            continue;
        }

        debug!(?batch, "delivering change batch");
        on_changes(batch);
    }
    debug!("listener worker finished");
}

fn absorb_result(batch: &mut ChangeSet, res: notify::Result<Event>) {
    match res {
        Ok(event) => absorb_event(batch, event),
        Err(err) => warn!("file watch error: {err}"),
    }
}

/// Classify one notify event into the batch.
///
/// Renames count as a removal of the old path and an addition of the new
/// one; access events are ignored.
pub fn absorb_event(batch: &mut ChangeSet, event: Event) {
    match event.kind {
        EventKind::Create(_) => batch.added.extend(event.paths),
        EventKind::Remove(_) => batch.removed.extend(event.paths),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            batch.removed.extend(event.paths)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => batch.added.extend(event.paths),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            if let Some(from) = paths.next() {
                batch.removed.insert(from);
            }
            batch.added.extend(paths);
        }
        EventKind::Modify(_) | EventKind::Any => batch.modified.extend(event.paths),
        EventKind::Access(_) | EventKind::Other => {}
    }
}
