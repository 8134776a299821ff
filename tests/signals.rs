// tests/signals.rs

mod common;
use crate::common::{project, OptionsBuilder, CWD, TWO_GROUPS};

use std::time::Duration;

use watchguard::supervisor::LifecycleState;
use watchguard::types::{ConsoleCommand, ControlSignal, RunAction};
use watchguard::watch::ChangeSet;
use watchguard_test_utils::with_timeout;

#[test]
fn pause_signal_is_idempotent() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    handle.on_signal(ControlSignal::Pause);
    handle.on_signal(ControlSignal::Pause);

    assert_eq!(handle.state(), LifecycleState::Paused);
    assert_eq!(
        h.journal.filtered("listener:"),
        vec!["listener:start", "listener:pause"]
    );
}

#[test]
fn resume_signal_only_acts_when_paused() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    handle.on_signal(ControlSignal::Resume);
    assert!(h.journal.filtered("listener:resume").is_empty());

    handle.on_signal(ControlSignal::Pause);
    handle.on_signal(ControlSignal::Resume);

    assert_eq!(handle.state(), LifecycleState::Running);
    assert_eq!(h.journal.filtered("listener:resume").len(), 1);
}

#[test]
fn changes_are_dropped_while_paused() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    handle.on_signal(ControlSignal::Pause);
    h.listener.emit(ChangeSet::new().modified(["/project/src/main.rs"]));
    assert!(h.runner.changes().is_empty());

    handle.on_signal(ControlSignal::Resume);
    h.listener.emit(ChangeSet::new().modified(["/project/src/main.rs"]));
    assert_eq!(h.runner.changes().len(), 1);
}

#[test]
fn interrupt_goes_to_an_attached_console() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.start().unwrap();
    assert!(h.interactor.attached());

    handle.on_signal(ControlSignal::Interrupt);

    assert_eq!(h.interactor.interrupts(), 1);
    assert_eq!(handle.state(), LifecycleState::Running);
}

#[test]
fn interrupt_without_a_console_stops_everything() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle
        .setup(OptionsBuilder::new(CWD).no_interactions().build())
        .unwrap();
    handle.start().unwrap();

    handle.on_signal(ControlSignal::Interrupt);

    assert_eq!(handle.state(), LifecycleState::Stopped);
    assert_eq!(h.interactor.interrupts(), 0);
    assert_eq!(h.runner.actions(), vec![RunAction::Start, RunAction::Stop]);
    assert!(!h.listener.is_started());
}

#[test]
fn stop_happens_once() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.start().unwrap();

    handle.stop();
    handle.stop();

    assert_eq!(h.runner.actions(), vec![RunAction::Start, RunAction::Stop]);
    assert!(!h.interactor.attached());
    assert_eq!(h.journal.filtered("listener:stop").len(), 1);
}

#[test]
fn console_commands_drive_the_supervisor() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    handle.execute(ConsoleCommand::TogglePause);
    assert_eq!(handle.state(), LifecycleState::Paused);
    handle.execute(ConsoleCommand::TogglePause);
    assert_eq!(handle.state(), LifecycleState::Running);

    handle.execute(ConsoleCommand::RunAll);
    handle.execute(ConsoleCommand::Reevaluate);
    handle.execute(ConsoleCommand::Exit);

    assert_eq!(
        h.runner.actions(),
        vec![
            RunAction::RunAll,
            RunAction::Stop,
            RunAction::Start,
            RunAction::Stop,
        ]
    );
    assert_eq!(handle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn wait_stopped_resolves_when_another_task_stops() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    let stopper = handle.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        tokio::task::spawn_blocking(move || stopper.stop()).await.unwrap();
    });

    with_timeout(handle.wait_stopped()).await;
    assert_eq!(handle.state(), LifecycleState::Stopped);
}

#[tokio::test]
async fn wait_stopped_returns_immediately_once_stopped() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.stop();

    with_timeout(handle.wait_stopped()).await;
}

#[tokio::test]
async fn setup_inside_a_runtime_can_be_repeated() {
    let h = project(TWO_GROUPS);
    let handle = h.handle();

    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();
    handle.setup(OptionsBuilder::new(CWD).build()).unwrap();

    assert_eq!(h.listener.starts(), 2);
    assert_eq!(handle.state(), LifecycleState::Running);
}
