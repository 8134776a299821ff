// src/plugin/registry.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use anyhow::Result;

use crate::errors::WatchguardError;
use crate::plugin::{log, shell, PluginSpec, PluginTask};

/// Constructor for one plugin type.
pub type PluginFactory = fn(&PluginSpec) -> Result<Arc<dyn PluginTask>>;

/// Explicit mapping from plugin type name to factory.
///
/// Populated at process start; declaring a plugin whose type is not
/// registered is an evaluation error.
#[derive(Clone, Default)]
pub struct PluginRegistry {
    factories: BTreeMap<String, PluginFactory>,
}

impl fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.factories.keys()).finish()
    }
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in plugin type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(shell::TYPE_NAME, shell::build);
        registry.register(log::TYPE_NAME, log::build);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, factory: PluginFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build a plugin instance for `spec.name`.
    pub fn create(&self, spec: &PluginSpec) -> crate::errors::Result<Arc<dyn PluginTask>> {
        let factory = self
            .factories
            .get(&spec.name)
            .ok_or_else(|| WatchguardError::UnknownPlugin(spec.name.clone()))?;
        Ok(factory(spec)?)
    }
}
