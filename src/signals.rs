// src/signals.rs

//! OS control signals.
//!
//! - `SIGUSR1` pauses the watcher (no-op when already paused).
//! - `SIGUSR2` resumes it (no-op unless paused).
//! - `SIGINT` goes to the attached console, or stops everything.
//!
//! Each delivery spawns a blocking task that takes the supervisor lock;
//! nothing runs inside the signal stream itself.

use tracing::{debug, warn};

use crate::supervisor::{Supervisor, SupervisorHandle};
use crate::types::ControlSignal;

/// Apply one control signal. The caller holds the supervisor lock.
pub fn apply_signal(supervisor: &mut Supervisor, signal: ControlSignal) {
    debug!(?signal, "control signal received");
    match signal {
        ControlSignal::Pause => {
            if !supervisor.is_paused() {
                supervisor.pause();
            }
        }
        ControlSignal::Resume => {
            if supervisor.is_paused() {
                supervisor.resume();
            }
        }
        ControlSignal::Interrupt => {
            if !supervisor.interrupt_interactor() {
                supervisor.stop();
            }
        }
    }
}

/// Install signal streams on the current tokio runtime.
///
/// Returns `false` when there is no runtime to install them on.
pub fn install(handle: &SupervisorHandle) -> bool {
    let Ok(runtime) = tokio::runtime::Handle::try_current() else {
        debug!("no async runtime; signal handlers not installed");
        return false;
    };
    let _enter = runtime.enter();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let kinds = [
            (SignalKind::user_defined1(), ControlSignal::Pause),
            (SignalKind::user_defined2(), ControlSignal::Resume),
            (SignalKind::interrupt(), ControlSignal::Interrupt),
        ];
        for (kind, control) in kinds {
            let mut stream = match signal(kind) {
                Ok(stream) => stream,
                Err(err) => {
                    warn!(?control, error = %err, "signal not supported on this host");
                    continue;
                }
            };
            let handle = handle.clone();
            runtime.spawn(async move {
                while stream.recv().await.is_some() {
                    dispatch(&handle, control);
                }
            });
        }
    }

    #[cfg(not(unix))]
    {
        let handle = handle.clone();
        runtime.spawn(async move {
            while tokio::signal::ctrl_c().await.is_ok() {
                dispatch(&handle, ControlSignal::Interrupt);
            }
        });
    }

    true
}

fn dispatch(handle: &SupervisorHandle, signal: ControlSignal) {
    let handle = handle.clone();
    tokio::task::spawn_blocking(move || handle.on_signal(signal));
}
