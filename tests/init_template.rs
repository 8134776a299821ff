// tests/init_template.rs

mod common;
use crate::common::{Harness, OptionsBuilder, CWD};

use std::path::Path;

use watchguard::config::template::{write_starter, STARTER};
use watchguard::fs::mock::MockFileSystem;
use watchguard::fs::FileSystem;

#[test]
fn starter_is_written_once() {
    let fs = MockFileSystem::new();
    let path = Path::new("/project/Watchguard.toml");

    write_starter(&fs, path).unwrap();
    assert_eq!(fs.read_to_string(path).unwrap(), STARTER);

    let err = write_starter(&fs, path).unwrap_err();
    assert!(err.to_string().contains("refusing to overwrite"), "{err}");
}

#[test]
fn starter_configuration_evaluates_cleanly() {
    common::init_tracing();
    let h = Harness::new(CWD);
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).inline(STARTER).build())
        .unwrap();

    let supervisor = handle.lock();
    assert_eq!(supervisor.model().group_names(), vec!["default"]);
    assert_eq!(supervisor.model().plugin_names(), vec!["shell"]);
}
