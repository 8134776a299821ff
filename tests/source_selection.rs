// tests/source_selection.rs

mod common;
use crate::common::{init_tracing, OptionsBuilder, CWD};

use std::io;
use std::path::{Path, PathBuf};

use watchguard::config::{resolve_sources, ConfigSource, FileSource};
use watchguard::errors::WatchguardError;
use watchguard::fs::mock::MockFileSystem;

fn file(source: &ConfigSource) -> &FileSource {
    match source {
        ConfigSource::File(file) => file,
        other => panic!("expected a file source, got {other:?}"),
    }
}

#[test]
fn empty_inline_contents_select_a_single_inline_source() {
    let options = OptionsBuilder::new(CWD).inline("").guardfile("other.toml").build();

    let sources = resolve_sources(&options);

    assert_eq!(sources, vec![ConfigSource::Inline(String::new())]);
}

#[test]
fn absent_inline_contents_fall_through_to_files() {
    let options = OptionsBuilder::new(CWD).build();
    assert!(options.guardfile_contents.is_none());

    let sources = resolve_sources(&options);

    assert!(!sources.is_empty());
    assert!(
        sources
            .iter()
            .all(|s| matches!(s, ConfigSource::File(_))),
        "expected only file sources, got {sources:?}"
    );
}

#[test]
fn explicit_paths_become_required_sources_without_fallback() {
    let options = OptionsBuilder::new(CWD)
        .guardfile("conf/a.toml")
        .guardfile("/etc/b.toml")
        .home("/home/me")
        .build();

    let sources = resolve_sources(&options);

    assert_eq!(
        sources,
        vec![
            ConfigSource::File(FileSource::required("/project/conf/a.toml")),
            ConfigSource::File(FileSource::required("/etc/b.toml")),
        ]
    );
}

#[test]
fn default_selection_is_project_file_with_home_fallback_then_user_file() {
    let options = OptionsBuilder::new(CWD)
        .home("/home/me")
        .config_dir("/home/me/.config")
        .build();

    let sources = resolve_sources(&options);

    assert_eq!(sources.len(), 2);
    let primary = file(&sources[0]);
    assert_eq!(primary.path(), Path::new("/project/Watchguard.toml"));
    assert_eq!(primary.fallback(), Some(Path::new("/home/me/.Watchguard.toml")));
    assert!(!primary.is_optional());

    let user = file(&sources[1]);
    assert_eq!(
        user.path(),
        Path::new("/home/me/.config/watchguard/watchguard.toml")
    );
    assert!(user.is_optional());
    assert!(user.fallback().is_none());
}

#[test]
fn missing_home_and_config_dir_drop_fallback_and_user_file() {
    let options = OptionsBuilder::new(CWD).build();

    let sources = resolve_sources(&options);

    assert_eq!(
        sources,
        vec![ConfigSource::File(FileSource::with_fallback(
            "/project/Watchguard.toml",
            None
        ))]
    );
}

#[test]
fn primary_file_is_read_when_present() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/project/Watchguard.toml", "interactor = false");
    fs.add_file("/home/me/.Watchguard.toml", "ignored");
    let source = ConfigSource::File(FileSource::with_fallback(
        "/project/Watchguard.toml",
        Some(PathBuf::from("/home/me/.Watchguard.toml")),
    ));

    let text = source.read(&fs).unwrap().expect("text");

    assert_eq!(text.text, "interactor = false");
    assert_eq!(text.origin, "/project/Watchguard.toml");
    assert_eq!(fs.reads(), vec![PathBuf::from("/project/Watchguard.toml")]);
}

#[test]
fn fallback_is_used_when_primary_is_missing() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/home/me/.Watchguard.toml", "from home");
    let source = ConfigSource::File(FileSource::with_fallback(
        "/project/Watchguard.toml",
        Some(PathBuf::from("/home/me/.Watchguard.toml")),
    ));

    let text = source.read(&fs).unwrap().expect("text");

    assert_eq!(text.text, "from home");
    assert_eq!(text.origin, "/home/me/.Watchguard.toml");
}

#[test]
fn missing_primary_and_fallback_report_the_primary_path() {
    init_tracing();
    let fs = MockFileSystem::new();
    let source = ConfigSource::File(FileSource::with_fallback(
        "/project/Watchguard.toml",
        Some(PathBuf::from("/home/me/.Watchguard.toml")),
    ));

    let err = source.read(&fs).unwrap_err();

    match &err {
        WatchguardError::SourceNotFound { path, has_fallback } => {
            assert_eq!(path, Path::new("/project/Watchguard.toml"));
            assert!(has_fallback);
        }
        other => panic!("expected SourceNotFound, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("/project/Watchguard.toml"), "{message}");
    assert!(message.contains("--init"), "{message}");
}

#[test]
fn missing_required_file_without_fallback_is_an_error() {
    init_tracing();
    let fs = MockFileSystem::new();
    let source = ConfigSource::File(FileSource::required("/etc/missing.toml"));

    let err = source.read(&fs).unwrap_err();

    assert!(matches!(
        err,
        WatchguardError::SourceNotFound {
            has_fallback: false,
            ..
        }
    ));
    assert!(err.to_string().contains("no configuration file exists at /etc/missing.toml"));
}

#[test]
fn missing_optional_file_is_skipped() {
    init_tracing();
    let fs = MockFileSystem::new();
    let source = ConfigSource::File(FileSource::optional("/home/me/.config/watchguard/watchguard.toml"));

    assert!(source.read(&fs).unwrap().is_none());
}

#[test]
fn permission_errors_are_fatal_even_for_optional_files() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_unreadable("/opt/user.toml", io::ErrorKind::PermissionDenied);
    let source = ConfigSource::File(FileSource::optional("/opt/user.toml"));

    let err = source.read(&fs).unwrap_err();

    match err {
        WatchguardError::SourceRead { path, source } => {
            assert_eq!(path, PathBuf::from("/opt/user.toml"));
            assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
        }
        other => panic!("expected SourceRead, got {other:?}"),
    }
}

#[test]
fn other_io_errors_do_not_trigger_the_fallback() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_unreadable("/project/Watchguard.toml", io::ErrorKind::InvalidData);
    fs.add_file("/home/me/.Watchguard.toml", "from home");
    let source = ConfigSource::File(FileSource::with_fallback(
        "/project/Watchguard.toml",
        Some(PathBuf::from("/home/me/.Watchguard.toml")),
    ));

    let err = source.read(&fs).unwrap_err();

    assert!(matches!(err, WatchguardError::SourceRead { .. }));
    assert_eq!(fs.reads(), vec![PathBuf::from("/project/Watchguard.toml")]);
}

#[test]
fn source_identity_matches_primary_and_fallback_after_normalisation() {
    let source = ConfigSource::File(FileSource::with_fallback(
        "/project/Watchguard.toml",
        Some(PathBuf::from("/home/me/.Watchguard.toml")),
    ));
    let cwd = Path::new(CWD);

    assert!(source.is_source(Path::new("/project/Watchguard.toml"), cwd));
    assert!(source.is_source(Path::new("Watchguard.toml"), cwd));
    assert!(source.is_source(Path::new("/project/src/../Watchguard.toml"), cwd));
    assert!(source.is_source(Path::new("/home/me/.Watchguard.toml"), cwd));
    assert!(!source.is_source(Path::new("/project/src/Watchguard.toml"), cwd));
    assert!(!ConfigSource::Inline("x".into()).is_source(Path::new("/project/Watchguard.toml"), cwd));
}
