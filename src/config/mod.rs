// src/config/mod.rs

//! Configuration for watchguard.
//!
//! Responsibilities:
//! - The immutable per-setup options snapshot (`options.rs`).
//! - Selecting and reading configuration sources (`source.rs`).
//! - The starter document written by `--init` (`template.rs`).

pub mod options;
pub mod source;
pub mod template;

pub use options::{Environment, ListenerTuning, Options};
pub use source::{resolve_sources, ConfigSource, FileSource, SourceSelection, SourceText};
