// src/dsl/evaluator.rs

//! Single-pass evaluation of a configuration document.
//!
//! Top-level directives are executed in the order their keys first appear
//! (the `toml` crate is built with `preserve_order`). All entries of an array
//! of tables such as `[[guard]]` form one directive, so entries split around
//! another table run together, in array order, at the first occurrence.
//! Every failure, whether a syntax error, a
//! malformed declaration, or a registrar rejection, is logged once as
//! `evaluating configuration failed: ...` and returned to the caller.

use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::dsl::decl::{GroupDecl, NotificationDecl, PluginDecl, ScopeDecl};
use crate::dsl::registrar::Registrar;
use crate::errors::{Result, WatchguardError};
use crate::model::{ScopeRequest, DEFAULT_GROUP};

/// Evaluate `text` (which came from `origin`) against `registrar`.
///
/// Empty or whitespace-only text is a valid document that declares nothing.
pub fn evaluate_text(text: &str, origin: &str, registrar: &mut dyn Registrar) -> Result<()> {
    match run_directives(text, registrar) {
        Ok(()) => Ok(()),
        Err(cause) => {
            let err = WatchguardError::evaluation(origin, cause);
            error!("{err}");
            Err(err)
        }
    }
}

fn run_directives(text: &str, registrar: &mut dyn Registrar) -> Result<()> {
    if text.trim().is_empty() {
        return Ok(());
    }

    let document: toml::Table = toml::from_str(text)?;

    for (directive, value) in document {
        debug!(directive = %directive, "evaluating directive");
        match directive.as_str() {
            "guard" => {
                for decl in entries::<PluginDecl>(&directive, value)? {
                    registrar.declare_plugin(DEFAULT_GROUP, decl)?;
                }
            }
            "group" => {
                for group in entries::<GroupDecl>(&directive, value)? {
                    registrar.declare_group(&group.name, group.options)?;
                    for decl in group.guard {
                        registrar.declare_plugin(&group.name, decl)?;
                    }
                }
            }
            "notification" => {
                for decl in entries::<NotificationDecl>(&directive, value)? {
                    registrar.declare_notification(&decl.name, decl.options)?;
                }
            }
            "scope" => {
                let scope: ScopeDecl = value.try_into()?;
                registrar.declare_scope(ScopeRequest {
                    groups: scope.groups,
                    plugins: scope.plugins,
                })?;
            }
            "ignore" => {
                let patterns: Vec<String> = value.try_into()?;
                registrar.declare_ignore(patterns)?;
            }
            "interactor" => match value {
                toml::Value::Boolean(enabled) => registrar.declare_interactor(enabled)?,
                other => {
                    return Err(anyhow::anyhow!(
                        "`interactor` must be a boolean, got {}",
                        other.type_str()
                    )
                    .into());
                }
            },
            other => {
                return Err(anyhow::anyhow!("unknown directive `{other}`").into());
            }
        }
    }

    Ok(())
}

/// Accept either an array of tables (`[[x]]`) or a single table (`[x]`).
fn entries<T: DeserializeOwned>(directive: &str, value: toml::Value) -> Result<Vec<T>> {
    match value {
        toml::Value::Array(_) => Ok(value.try_into()?),
        toml::Value::Table(_) => Ok(vec![value.try_into()?]),
        other => Err(anyhow::anyhow!(
            "`{directive}` must be a table or an array of tables, got {}",
            other.type_str()
        )
        .into()),
    }
}
