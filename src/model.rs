// src/model.rs

//! The live model: groups, plugins and scope as currently configured.
//!
//! The supervisor exclusively owns one [`LiveModel`]; it is reset to its
//! defaults before every evaluation pass and repopulated by the
//! configuration evaluator.

use tracing::debug;

use crate::errors::{Result, WatchguardError};
use crate::plugin::{OptionsTable, Plugin};
use crate::types::Name;
use crate::watch::IgnoreRules;

/// Name of the group that always exists after a reset.
pub const DEFAULT_GROUP: &str = "default";

/// Named collection of plugins sharing options.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    name: Name,
    options: OptionsTable,
}

impl Group {
    pub fn new(name: impl Into<Name>, options: OptionsTable) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &OptionsTable {
        &self.options
    }

    /// Whether a failing plugin stops the remaining plugins of this group.
    pub fn halt_on_fail(&self) -> bool {
        matches!(
            self.options.get("halt_on_fail"),
            Some(toml::Value::Boolean(true))
        )
    }
}

/// Group/plugin names requested as the active subset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScopeRequest {
    pub groups: Vec<String>,
    pub plugins: Vec<String>,
}

impl ScopeRequest {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.plugins.is_empty()
    }
}

/// The active subset of the model. Empty sequences mean "all".
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub groups: Vec<Group>,
    pub plugins: Vec<Plugin>,
}

impl Scope {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty() && self.plugins.is_empty()
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(Group::name).collect()
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(Plugin::name).collect()
    }
}

#[derive(Debug, Clone)]
pub struct LiveModel {
    groups: Vec<Group>,
    plugins: Vec<Plugin>,
    scope: Scope,
    /// Filters declared by the configuration's `scope` directive.
    declared_scope: ScopeRequest,
    ignore: IgnoreRules,
    interactor_enabled: bool,
}

impl Default for LiveModel {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            plugins: Vec::new(),
            scope: Scope::default(),
            declared_scope: ScopeRequest::default(),
            ignore: IgnoreRules::default(),
            interactor_enabled: true,
        }
    }
}

impl LiveModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups go back to just the `default` group. Configuration-level
    /// directives (ignore rules, interactor switch) are reset with them.
    pub fn reset_groups(&mut self) {
        self.groups = vec![Group::new(DEFAULT_GROUP, OptionsTable::new())];
        self.ignore = IgnoreRules::default();
        self.interactor_enabled = true;
    }

    pub fn reset_plugins(&mut self) {
        self.plugins.clear();
    }

    pub fn reset_scope(&mut self) {
        self.scope = Scope::default();
        self.declared_scope = ScopeRequest::default();
    }

    pub fn reset(&mut self) {
        self.reset_groups();
        self.reset_plugins();
        self.reset_scope();
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn group_names(&self) -> Vec<&str> {
        self.groups.iter().map(Group::name).collect()
    }

    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    pub fn plugin_names(&self) -> Vec<&str> {
        self.plugins.iter().map(Plugin::name).collect()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn declared_scope(&self) -> &ScopeRequest {
        &self.declared_scope
    }

    pub fn ignore(&self) -> &IgnoreRules {
        &self.ignore
    }

    pub fn interactor_enabled(&self) -> bool {
        self.interactor_enabled
    }

    /// Add a group, or return the existing group of that name unchanged.
    pub fn add_group(&mut self, name: &str, options: OptionsTable) -> &Group {
        if let Some(idx) = self.groups.iter().position(|g| g.name == name) {
            debug!(group = name, "group already declared; keeping existing options");
            return &self.groups[idx];
        }
        self.groups.push(Group::new(name, options));
        &self.groups[self.groups.len() - 1]
    }

    pub fn add_plugin(&mut self, plugin: Plugin) {
        debug!(plugin = plugin.name(), group = plugin.group().name(), "plugin declared");
        self.plugins.push(plugin);
    }

    pub fn set_declared_scope(&mut self, request: ScopeRequest) {
        self.declared_scope = request;
    }

    pub fn set_ignore(&mut self, ignore: IgnoreRules) {
        self.ignore = ignore;
    }

    pub fn set_interactor_enabled(&mut self, enabled: bool) {
        self.interactor_enabled = enabled;
    }

    /// Compute the scope from filters. Every name must exist in the model.
    ///
    /// A group filter selects that group; a plugin filter selects every
    /// plugin declared under that name.
    pub fn resolve_scope(&self, request: &ScopeRequest) -> Result<Scope> {
        let mut scope = Scope::default();

        for name in &request.groups {
            let group = self
                .group(name)
                .ok_or_else(|| WatchguardError::ScopeResolution {
                    kind: "group",
                    name: name.clone(),
                })?;
            scope.groups.push(group.clone());
        }

        for name in &request.plugins {
            let matching: Vec<Plugin> = self
                .plugins
                .iter()
                .filter(|p| p.name() == name)
                .cloned()
                .collect();
            if matching.is_empty() {
                return Err(WatchguardError::ScopeResolution {
                    kind: "plugin",
                    name: name.clone(),
                });
            }
            scope.plugins.extend(matching);
        }

        Ok(scope)
    }

    pub fn set_scope(&mut self, scope: Scope) {
        self.scope = scope;
    }

    /// Active plugins in dispatch order.
    ///
    /// An explicit plugin scope wins; otherwise plugins are walked group by
    /// group, in group declaration order, restricted to the scoped groups if
    /// any.
    pub fn scoped_plugins(&self) -> Vec<Plugin> {
        if !self.scope.plugins.is_empty() {
            return self.scope.plugins.clone();
        }

        let groups: &[Group] = if self.scope.groups.is_empty() {
            &self.groups
        } else {
            &self.scope.groups
        };

        groups
            .iter()
            .flat_map(|group| {
                self.plugins
                    .iter()
                    .filter(move |p| p.group().name() == group.name())
            })
            .cloned()
            .collect()
    }
}
