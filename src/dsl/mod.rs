// src/dsl/mod.rs

//! The configuration language.
//!
//! A configuration source is a TOML document whose top-level keys are
//! directives (`guard`, `group`, `notification`, `scope`, `ignore`,
//! `interactor`). The evaluator maps each directive onto a [`Registrar`]
//! call; the supervisor's live model is the production registrar.

pub mod decl;
pub mod evaluator;
pub mod registrar;

pub use decl::{GroupDecl, NotificationDecl, PluginDecl, ScopeDecl};
pub use evaluator::evaluate_text;
pub use registrar::Registrar;
