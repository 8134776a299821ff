// src/interactor/mod.rs

//! Interactive console collaborator.
//!
//! The supervisor only starts and stops the console and forwards interrupts
//! to it. Commands typed by the user travel back over a channel and are
//! executed by the main loop under the supervisor lock.

use crate::errors::Result;

pub mod console;

pub use console::ConsoleInteractor;

pub trait Interactor: Send {
    fn start(&mut self) -> Result<()>;

    fn stop(&mut self);

    /// Whether a console is currently attached to the terminal.
    fn is_attached(&self) -> bool;

    /// Forwarded `SIGINT`.
    fn interrupt(&mut self);
}

/// Lazily builds the interactor the first time the supervisor needs one.
pub type InteractorFactory = Box<dyn FnMut() -> Box<dyn Interactor> + Send>;
