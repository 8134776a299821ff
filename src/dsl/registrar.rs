// src/dsl/registrar.rs

use crate::dsl::decl::PluginDecl;
use crate::errors::Result;
use crate::model::ScopeRequest;
use crate::plugin::OptionsTable;

/// Registration surface the evaluator drives, one call per declaration.
pub trait Registrar {
    /// Declare a group. Re-declaring an existing group is not an error.
    fn declare_group(&mut self, name: &str, options: OptionsTable) -> Result<()>;

    /// Declare a plugin inside `group` (which has already been declared).
    fn declare_plugin(&mut self, group: &str, decl: PluginDecl) -> Result<()>;

    fn declare_notification(&mut self, name: &str, options: OptionsTable) -> Result<()>;

    fn declare_scope(&mut self, request: ScopeRequest) -> Result<()>;

    /// Regular expressions over relative paths that never count as changes.
    fn declare_ignore(&mut self, patterns: Vec<String>) -> Result<()>;

    fn declare_interactor(&mut self, enabled: bool) -> Result<()>;
}
