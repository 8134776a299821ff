// src/config/template.rs

use std::path::Path;

use anyhow::{bail, Result};
use tracing::info;

use crate::fs::FileSystem;

/// Starter document written by `watchguard --init`.
pub const STARTER: &str = r#"# Watchguard.toml
#
# Plugins declared at the top level belong to the `default` group.

[[guard]]
name = "shell"
watch = ["src/**/*"]
cmd = "echo changed: {files}"

# [[group]]
# name = "tests"
# halt_on_fail = true
#
# [[group.guard]]
# name = "shell"
# watch = ["tests/**/*"]
# cmd = "make test"

# [[notification]]
# name = "terminal"
"#;

/// Write the starter configuration to `path` unless a file already exists.
pub fn write_starter(fs: &dyn FileSystem, path: &Path) -> Result<()> {
    if fs.exists(path) {
        bail!("{} already exists; refusing to overwrite it", path.display());
    }
    fs.write(path, STARTER.as_bytes())?;
    info!("Wrote starter configuration to {}.", path.display());
    Ok(())
}
