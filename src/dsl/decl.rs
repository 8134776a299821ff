// src/dsl/decl.rs

//! Serde shapes of the declarations in a configuration document.

use serde::Deserialize;

use crate::plugin::OptionsTable;

/// `[[guard]]` / `[[group.guard]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginDecl {
    /// Plugin type name, resolved through the plugin registry.
    pub name: String,

    /// Glob patterns, relative to the watch directory, this plugin reacts to.
    #[serde(default)]
    pub watch: Vec<String>,

    /// Glob patterns excluded from `watch`.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Everything else is handed to the plugin as its options.
    #[serde(flatten)]
    pub options: OptionsTable,
}

/// `[[group]]` entry with its nested plugins.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupDecl {
    pub name: String,

    #[serde(default)]
    pub guard: Vec<PluginDecl>,

    /// Group options such as `halt_on_fail`.
    #[serde(flatten)]
    pub options: OptionsTable,
}

/// `[[notification]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationDecl {
    pub name: String,

    #[serde(flatten)]
    pub options: OptionsTable,
}

/// `[scope]` table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeDecl {
    #[serde(default)]
    pub groups: Vec<String>,

    #[serde(default)]
    pub plugins: Vec<String>,
}
