// src/supervisor/state.rs

use std::fmt;

/// Lifecycle of the supervisor.
///
/// `Uninitialized -> Configuring -> Running <-> Paused`, and `Stopped` from
/// `Running` or `Paused`. A re-evaluation happens while `Running`/`Paused`
/// and is not a state of its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    Configuring,
    Running,
    Paused,
    Stopped,
}

impl LifecycleState {
    pub fn is_active(&self) -> bool {
        matches!(self, LifecycleState::Running | LifecycleState::Paused)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Configuring => "configuring",
            LifecycleState::Running => "running",
            LifecycleState::Paused => "paused",
            LifecycleState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
