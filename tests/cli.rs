// tests/cli.rs

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use watchguard::cli::{CliArgs, LogLevel};
use watchguard::config::{Environment, Options};
use watchguard::logging::resolve_level;

fn parse(args: &[&str]) -> CliArgs {
    CliArgs::try_parse_from(std::iter::once("watchguard").chain(args.iter().copied())).unwrap()
}

#[test]
fn defaults_produce_default_options() {
    let env = Environment::rooted_at("/project");
    let options = Options::from_cli(&parse(&[]), env.clone()).unwrap();

    assert_eq!(options, Options::new(env));
    assert!(options.notify);
    assert!(options.guardfile_contents.is_none());
}

#[test]
fn flags_map_onto_options() {
    let args = parse(&[
        "-c", "-n", "-d", "-i", "-p",
        "-g", "backend", "--group", "frontend",
        "-P", "shell",
        "-w", "src", "-w", "/abs",
        "-G", "custom.toml",
        "-l", "0.5",
        "-y", "2",
    ]);
    let options = Options::from_cli(&args, Environment::rooted_at("/project")).unwrap();

    assert!(options.clear);
    assert!(!options.notify);
    assert!(options.debug);
    assert!(options.no_interactions);
    assert_eq!(options.groups, vec!["backend", "frontend"]);
    assert_eq!(options.plugins, vec!["shell"]);
    assert_eq!(options.watchdirs, vec![PathBuf::from("src"), PathBuf::from("/abs")]);
    assert_eq!(options.guardfiles, vec![PathBuf::from("custom.toml")]);
    assert!(options.listener.force_polling);
    assert_eq!(options.listener.latency, Some(Duration::from_millis(500)));
    assert_eq!(options.listener.wait_for_delay, Some(Duration::from_secs(2)));
}

#[test]
fn unknown_flags_are_rejected() {
    let result =
        CliArgs::try_parse_from(["watchguard", "--bogus"]);
    assert!(result.is_err());
}

#[test]
fn durations_must_be_finite_and_non_negative() {
    let rejected = [
        vec!["--latency=-1"],
        vec!["--latency=NaN"],
        vec!["--latency=inf"],
        vec!["--wait-for-delay=-0.5"],
        vec!["-y", "abc"],
    ];
    for args in rejected {
        let result = CliArgs::try_parse_from(std::iter::once("watchguard").chain(args.clone()));
        assert!(result.is_err(), "{args:?} should be rejected");
    }

    let args = parse(&["--latency=0"]);
    assert_eq!(args.latency, Some(0.0));
}

#[test]
fn invalid_durations_built_in_code_are_errors() {
    let args = CliArgs {
        wait_for_delay: Some(-1.0),
        ..CliArgs::default()
    };
    let result = Options::from_cli(&args, Environment::rooted_at("/project"));
    assert!(result.is_err());

    let args = CliArgs {
        latency: Some(f64::NAN),
        ..CliArgs::default()
    };
    assert!(Options::from_cli(&args, Environment::rooted_at("/project")).is_err());
}

#[test]
fn kill_switch_overrides_the_notify_option() {
    let mut env = Environment::rooted_at("/project");
    env.notify_switch = Some("false".into());

    let options = Options::from_cli(&parse(&[]), env).unwrap();
    assert!(options.notify);
    assert!(!options.notifications_enabled());
}

#[test]
fn log_level_priority() {
    use tracing::Level;

    assert_eq!(resolve_level(None, false, None), Level::INFO);
    assert_eq!(resolve_level(None, false, Some("warning")), Level::WARN);
    assert_eq!(resolve_level(None, false, Some("nonsense")), Level::INFO);
    assert_eq!(resolve_level(None, true, Some("error")), Level::DEBUG);
    assert_eq!(resolve_level(Some(LogLevel::Trace), true, Some("error")), Level::TRACE);

    let args = parse(&["--log-level", "warn"]);
    assert_eq!(resolve_level(args.log_level, args.debug, None), Level::WARN);
}
