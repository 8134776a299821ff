// tests/common/mod.rs

#![allow(dead_code)]

pub use watchguard_test_utils::{init_tracing, Harness, OptionsBuilder};

/// Working directory used by every in-memory test project.
pub const CWD: &str = "/project";

/// A project with a `Watchguard.toml` containing `config`.
pub fn project(config: &str) -> Harness {
    init_tracing();
    let harness = Harness::new(CWD);
    harness.write("Watchguard.toml", config);
    harness
}

/// Two plugins in the default group and one in `docs`.
pub const TWO_GROUPS: &str = r#"
[[guard]]
name = "log"
watch = ["src/**/*.rs"]

[[guard]]
name = "shell"
watch = ["Cargo.toml"]
cmd = "cargo check"

[[group]]
name = "docs"
halt_on_fail = true

[[group.guard]]
name = "log"
watch = ["docs/**/*.md"]
"#;
