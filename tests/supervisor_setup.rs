// tests/supervisor_setup.rs

mod common;
use crate::common::{project, Harness, OptionsBuilder, CWD, TWO_GROUPS};

use std::path::PathBuf;
use std::time::Duration;

use watchguard::errors::WatchguardError;
use watchguard::model::DEFAULT_GROUP;
use watchguard::supervisor::{LifecycleState, SupervisorHandle};
use watchguard::types::RunAction;

/// Scoped plugins as `group/plugin`, in dispatch order.
fn scoped(handle: &SupervisorHandle) -> Vec<String> {
    handle
        .lock()
        .model()
        .scoped_plugins()
        .iter()
        .map(|p| format!("{}/{}", p.group().name(), p.name()))
        .collect()
}

#[test]
fn setup_builds_the_model_in_declaration_order() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    let supervisor = handle.lock();
    assert_eq!(supervisor.state(), LifecycleState::Running);
    assert_eq!(supervisor.model().group_names(), vec!["default", "docs"]);
    assert_eq!(supervisor.model().plugin_names(), vec!["log", "shell", "log"]);
    assert_eq!(supervisor.watchdirs(), &[PathBuf::from(CWD)]);
    assert!(h.listener.is_started());
    assert_eq!(h.listener.watchdirs(), vec![PathBuf::from(CWD)]);
}

#[test]
fn setup_runs_in_order_listener_then_evaluation_then_notifier() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    assert_eq!(
        h.journal.entries(),
        vec![
            "listener:start".to_string(),
            "fs:read:/project/Watchguard.toml".to_string(),
            "notifier:turn_on".to_string(),
        ]
    );
}

#[test]
fn inline_plugins_without_groups_land_in_the_default_group() {
    let h = Harness::new(CWD);
    let handle = h.handle();

    handle
        .setup(
            OptionsBuilder::new(CWD)
                .inline("[[guard]]\nname = \"log\"\n")
                .build(),
        )
        .unwrap();

    let supervisor = handle.lock();
    assert!(supervisor.model().group_names().contains(&DEFAULT_GROUP));
    assert_eq!(supervisor.model().plugins()[0].group().name(), DEFAULT_GROUP);
    assert!(h.fs.reads().is_empty(), "inline configuration must not read files");
}

#[test]
fn empty_inline_configuration_is_not_an_error() {
    let h = Harness::new(CWD);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).inline("").build()).unwrap();

    let supervisor = handle.lock();
    assert!(supervisor.model().plugins().is_empty());
    assert_eq!(supervisor.model().group_names(), vec![DEFAULT_GROUP]);
}

#[test]
fn missing_configuration_fails_setup_with_the_primary_path() {
    let h = Harness::new(CWD);
    let handle = h.handle();

    let err = handle
        .setup(OptionsBuilder::new(CWD).home("/home/me").build())
        .unwrap_err();

    assert!(matches!(err, WatchguardError::SourceNotFound { .. }));
    assert!(err.to_string().contains("/project/Watchguard.toml"));
}

#[test]
fn home_fallback_is_evaluated_when_the_project_file_is_missing() {
    let h = Harness::new(CWD);
    h.fs.add_file("/home/me/.Watchguard.toml", "[[guard]]\nname = \"log\"\n");
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).home("/home/me").build())
        .unwrap();

    assert_eq!(handle.lock().model().plugin_names(), vec!["log"]);
}

#[test]
fn optional_user_file_is_evaluated_after_the_project_file() {
    let h = project("[[guard]]\nname = \"log\"\n");
    h.fs.add_file(
        "/home/me/.config/watchguard/watchguard.toml",
        "[[guard]]\nname = \"shell\"\ncmd = \"true\"\n",
    );
    let handle = h.handle();

    handle
        .setup(
            OptionsBuilder::new(CWD)
                .config_dir("/home/me/.config")
                .build(),
        )
        .unwrap();

    assert_eq!(handle.lock().model().plugin_names(), vec!["log", "shell"]);
}

#[test]
fn evaluation_failures_propagate_out_of_setup() {
    let h = project("[[guard]]\nname = \"does-not-exist\"\n");
    let handle = h.handle();

    let err = handle.setup(OptionsBuilder::new(CWD).build()).unwrap_err();

    match err {
        WatchguardError::Evaluation { origin, message } => {
            assert_eq!(origin, "/project/Watchguard.toml");
            assert!(message.contains("does-not-exist"), "{message}");
        }
        other => panic!("expected an evaluation error, got {other:?}"),
    }
}

#[test]
fn invalid_plugin_options_are_evaluation_errors() {
    let h = project("[[guard]]\nname = \"shell\"\n");
    let handle = h.handle();

    let err = handle.setup(OptionsBuilder::new(CWD).build()).unwrap_err();

    assert!(err.to_string().contains("requires a `cmd` option"), "{err}");
}

#[test]
fn group_filter_restricts_the_scope() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).group("docs").build())
        .unwrap();

    assert_eq!(scoped(&handle), vec!["docs/log"]);
    assert_eq!(handle.lock().model().scope().group_names(), vec!["docs"]);
}

#[test]
fn plugin_filter_selects_every_plugin_of_that_name() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).plugin("log").build())
        .unwrap();

    assert_eq!(scoped(&handle), vec!["default/log", "docs/log"]);
}

#[test]
fn unknown_scope_names_are_fatal() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    let err = handle
        .setup(OptionsBuilder::new(CWD).group("backend").build())
        .unwrap_err();
    assert!(matches!(
        err,
        WatchguardError::ScopeResolution { kind: "group", ref name } if name == "backend"
    ));

    let err = handle
        .setup(OptionsBuilder::new(CWD).plugin("rspec").build())
        .unwrap_err();
    assert!(matches!(err, WatchguardError::ScopeResolution { kind: "plugin", .. }));
}

#[test]
fn declared_scope_applies_unless_overridden_on_the_command_line() {
    let config = format!("{TWO_GROUPS}\n[scope]\ngroups = [\"docs\"]\n");
    let h = project(&config);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    assert_eq!(scoped(&handle), vec!["docs/log"]);

    handle
        .setup(OptionsBuilder::new(CWD).group(DEFAULT_GROUP).build())
        .unwrap();
    assert_eq!(scoped(&handle), vec!["default/log", "default/shell"]);
}

#[test]
fn notifier_follows_the_option_and_the_kill_switch() {
    let cases = [
        (true, None, true),
        (false, None, false),
        (true, Some("false"), false),
        (true, Some("true"), true),
        (false, Some("true"), false),
    ];

    for (notify, switch, expected) in cases {
        let h = project(TWO_GROUPS);
        let handle = h.handle();
        let mut options = OptionsBuilder::new(CWD).notify(notify);
        if let Some(value) = switch {
            options = options.notify_switch(value);
        }

        handle.setup(options.build()).unwrap();

        assert_eq!(
            h.notifier.enabled(),
            expected,
            "notify={notify} switch={switch:?}"
        );
    }
}

#[test]
fn listener_receives_the_tuning_options() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).latency(0.5).force_polling().build())
        .unwrap();

    let tuning = h.listener.tuning().expect("listener started");
    assert_eq!(tuning.latency, Some(Duration::from_millis(500)));
    assert!(tuning.force_polling);
    assert_eq!(tuning.wait_for_delay, None);
}

#[test]
fn relative_watch_directories_are_expanded_and_must_exist() {
    let h = project(TWO_GROUPS);
    h.fs.add_dir("/project/app");
    let handle = h.handle();

    handle
        .setup(OptionsBuilder::new(CWD).watchdir("app").watchdir("/project/app").build())
        .unwrap();
    assert_eq!(handle.lock().watchdirs(), &[PathBuf::from("/project/app")]);

    let err = handle
        .setup(OptionsBuilder::new(CWD).watchdir("missing").build())
        .unwrap_err();
    assert!(err.to_string().contains("/project/missing"), "{err}");
}

#[test]
fn setup_is_reentrant_and_rebuilds_from_scratch() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    let supervisor = handle.lock();
    assert_eq!(supervisor.model().group_names(), vec!["default", "docs"]);
    assert_eq!(supervisor.model().plugins().len(), 3);
    assert_eq!(h.listener.starts(), 2);
}

#[test]
fn start_broadcasts_start_and_attaches_the_console_once() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    handle.start().unwrap();
    handle.start().unwrap();

    assert_eq!(h.runner.actions(), vec![RunAction::Start, RunAction::Start]);
    assert_eq!(h.interactor.created(), 1);
    assert!(h.interactor.attached());
}

#[test]
fn console_is_not_attached_when_interactions_are_disabled() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle
        .setup(OptionsBuilder::new(CWD).no_interactions().build())
        .unwrap();
    handle.start().unwrap();
    assert_eq!(h.interactor.created(), 0);

    let h = project(&format!("interactor = false\n{TWO_GROUPS}"));
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.start().unwrap();
    assert_eq!(h.interactor.created(), 0);
}

#[test]
fn declared_notification_backends_reach_the_notifier() {
    let h = project(&format!("{TWO_GROUPS}\n[[notification]]\nname = \"terminal\"\n"));
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    assert_eq!(h.notifier.backends(), vec!["terminal"]);
}
