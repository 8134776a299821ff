// src/notifier/mod.rs

//! Notifier collaborator.
//!
//! The supervisor turns the notifier on or off, registers the backends the
//! configuration declares, clears them before a re-evaluation, and sends
//! user notifications through it.

use crate::errors::Result;
use crate::plugin::OptionsTable;
use crate::types::NotifyOptions;

pub mod backend;

pub use backend::{BackendNotifier, NotificationBackend};

pub trait Notifier: Send {
    fn turn_on(&mut self);

    fn turn_off(&mut self);

    fn is_enabled(&self) -> bool;

    /// Deliver a message through every active backend. No-op when disabled.
    fn notify(&self, message: &str, options: &NotifyOptions);

    /// Register a backend declared by the configuration.
    fn add_backend(&mut self, name: &str, options: &OptionsTable) -> Result<()>;

    /// Forget every registered backend. Does not change enablement.
    fn clear_backends(&mut self);

    fn backend_names(&self) -> Vec<String>;
}
