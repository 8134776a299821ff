// tests/notifier.rs

use watchguard::errors::WatchguardError;
use watchguard::notifier::{BackendNotifier, NotificationBackend, Notifier};
use watchguard::plugin::OptionsTable;
use watchguard::types::{NotifyImage, NotifyOptions};

fn options(text: &str) -> OptionsTable {
    toml::from_str(text).unwrap()
}

#[test]
fn backends_are_resolved_by_name() {
    assert_eq!(
        NotificationBackend::from_declaration("log", &options("")).unwrap(),
        NotificationBackend::Log
    );
    assert_eq!(
        NotificationBackend::from_declaration("terminal", &options("")).unwrap(),
        NotificationBackend::Terminal
    );
    assert_eq!(
        NotificationBackend::from_declaration(
            "command",
            &options("program = \"notify-send\"\nargs = [\"-u\", \"low\"]")
        )
        .unwrap(),
        NotificationBackend::Command {
            program: "notify-send".into(),
            args: vec!["-u".into(), "low".into()],
        }
    );
}

#[test]
fn bad_declarations_are_rejected() {
    let unknown = NotificationBackend::from_declaration("growl", &options("")).unwrap_err();
    assert!(matches!(unknown, WatchguardError::UnknownNotifier(ref n) if n == "growl"));

    let no_program = NotificationBackend::from_declaration("command", &options("")).unwrap_err();
    assert!(no_program.to_string().contains("requires a string `program`"));

    let bad_args =
        NotificationBackend::from_declaration("command", &options("program = \"x\"\nargs = 1"))
            .unwrap_err();
    assert!(!bad_args.to_string().is_empty());
}

#[test]
fn backends_are_deduplicated_and_cleared() {
    let mut notifier = BackendNotifier::new();
    notifier.add_backend("terminal", &options("")).unwrap();
    notifier.add_backend("log", &options("")).unwrap();
    notifier.add_backend("terminal", &options("")).unwrap();

    assert_eq!(notifier.backend_names(), vec!["terminal", "log"]);

    notifier.clear_backends();
    assert!(notifier.backend_names().is_empty());
}

#[test]
fn clearing_backends_keeps_enablement() {
    let mut notifier = BackendNotifier::new();
    assert!(!notifier.is_enabled());

    notifier.turn_on();
    notifier.clear_backends();
    assert!(notifier.is_enabled());

    notifier.turn_off();
    assert!(!notifier.is_enabled());
}

#[cfg(unix)]
#[test]
fn command_backend_receives_title_and_message_last() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("notified");
    let script = format!("printf '%s|%s' \"$0\" \"$1\" > '{}'", out.display());

    let mut notifier = BackendNotifier::new();
    let mut table = OptionsTable::new();
    table.insert("program".into(), toml::Value::String("sh".into()));
    table.insert(
        "args".into(),
        toml::Value::Array(vec![
            toml::Value::String("-c".into()),
            toml::Value::String(script),
        ]),
    );
    notifier.add_backend("command", &table).unwrap();

    let opts = NotifyOptions::titled("Watchguard").with_image(NotifyImage::Failed);

    notifier.notify("ignored while off", &opts);
    assert!(!out.exists());

    notifier.turn_on();
    notifier.notify("tests failed", &opts);
    assert_eq!(
        std::fs::read_to_string(&out).unwrap(),
        "Watchguard|tests failed"
    );
}

#[test]
fn a_failing_command_backend_does_not_panic() {
    let mut notifier = BackendNotifier::new().with_command_logging(true);
    notifier
        .add_backend(
            "command",
            &options("program = \"/definitely/not/a/notifier\""),
        )
        .unwrap();
    notifier.turn_on();

    notifier.notify("hello", &NotifyOptions::titled("Watchguard"));
}
