// src/watch/mod.rs

//! Change detection plumbing.
//!
//! This module is responsible for:
//! - Compiling per-plugin `watch` / `exclude` glob patterns and global
//!   ignore rules.
//! - Relativising absolute change paths against the watch directories.
//! - Deciding whether a raw change set is relevant enough to dispatch.
//!
//! It does **not** watch the filesystem itself; see [`crate::listener`].

pub mod changes;
pub mod filter;
pub mod path_utils;
pub mod patterns;
pub mod resolver;

pub use changes::{ChangeSet, RelativeChanges};
pub use filter::{FilterSnapshot, SnapshotCell};
pub use patterns::{IgnoreRules, WatchProfile};
pub use resolver::PathResolver;
