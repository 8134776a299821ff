// src/supervisor/registration.rs

//! The production [`Registrar`]: declarations land in the live model, the
//! notifier and the plugin registry.

use tracing::debug;

use crate::dsl::{PluginDecl, Registrar};
use crate::errors::{Result, WatchguardError};
use crate::model::{LiveModel, ScopeRequest};
use crate::notifier::Notifier;
use crate::plugin::{OptionsTable, Plugin, PluginRegistry, PluginSpec};
use crate::watch::WatchProfile;

pub(crate) struct Registration<'a> {
    pub model: &'a mut LiveModel,
    pub notifier: &'a mut dyn Notifier,
    pub registry: &'a PluginRegistry,
    pub log_commands: bool,
}

impl Registrar for Registration<'_> {
    fn declare_group(&mut self, name: &str, options: OptionsTable) -> Result<()> {
        self.model.add_group(name, options);
        Ok(())
    }

    fn declare_plugin(&mut self, group: &str, decl: PluginDecl) -> Result<()> {
        let group = self
            .model
            .group(group)
            .cloned()
            .ok_or_else(|| WatchguardError::ScopeResolution {
                kind: "group",
                name: group.to_string(),
            })?;

        let task = self.registry.create(&PluginSpec {
            name: decl.name.clone(),
            options: decl.options.clone(),
            log_commands: self.log_commands,
        })?;
        let profile = WatchProfile::new(&decl.watch, &decl.exclude)?;

        self.model
            .add_plugin(Plugin::new(decl.name, group, decl.options, profile, task));
        Ok(())
    }

    fn declare_notification(&mut self, name: &str, options: OptionsTable) -> Result<()> {
        debug!(backend = name, "notification backend declared");
        self.notifier.add_backend(name, &options)
    }

    fn declare_scope(&mut self, request: ScopeRequest) -> Result<()> {
        self.model.set_declared_scope(request);
        Ok(())
    }

    fn declare_ignore(&mut self, patterns: Vec<String>) -> Result<()> {
        let ignore = self.model.ignore().extend(&patterns)?;
        self.model.set_ignore(ignore);
        Ok(())
    }

    fn declare_interactor(&mut self, enabled: bool) -> Result<()> {
        self.model.set_interactor_enabled(enabled);
        Ok(())
    }
}
