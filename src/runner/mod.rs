// src/runner/mod.rs

//! Runner collaborator: fans supervisor broadcasts out to plugins.
//!
//! The supervisor never invokes plugin hooks itself. It hands the scoped
//! plugins, in dispatch order, to a [`Runner`] and waits for it to return.

use crate::errors::Result;
use crate::plugin::Plugin;
use crate::types::RunAction;
use crate::watch::RelativeChanges;

pub mod task_runner;

pub use task_runner::TaskRunner;

pub trait Runner: Send {
    /// Broadcast `action` to every plugin, in order.
    fn run(&mut self, action: RunAction, plugins: &[Plugin]) -> Result<()>;

    /// Broadcast relativised changes (modified, added, removed) to every
    /// plugin, in order.
    fn run_on_changes(&mut self, plugins: &[Plugin], changes: &RelativeChanges) -> Result<()>;
}
