// src/listener/mod.rs

//! Watcher collaborator.
//!
//! The supervisor owns a [`Listener`] and only ever starts, stops, pauses
//! and resumes it. Change batches come back through a [`ChangeCallback`]
//! that runs on the listener's own worker thread.

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ListenerTuning;
use crate::errors::Result;
use crate::watch::ChangeSet;

pub mod notify_listener;

pub use notify_listener::NotifyListener;

/// Receives each batch of absolute-path changes.
pub type ChangeCallback = Arc<dyn Fn(ChangeSet) + Send + Sync>;

pub trait Listener: Send {
    /// Start watching `watchdirs` recursively. Starting an already started
    /// listener replaces the previous watch.
    fn start(
        &mut self,
        watchdirs: &[PathBuf],
        tuning: &ListenerTuning,
        on_changes: ChangeCallback,
    ) -> Result<()>;

    /// Stop watching. Idempotent.
    fn stop(&mut self);

    /// Stop delivering changes. Idempotent.
    fn pause(&mut self);

    /// Deliver changes again. Idempotent.
    fn resume(&mut self);

    fn is_paused(&self) -> bool;
}
