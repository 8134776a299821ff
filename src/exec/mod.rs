// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] wraps the two external-process call sites (shell plugin
//!   commands and notification programs) with optional command logging.

pub mod command;

pub use command::{shell, system};
