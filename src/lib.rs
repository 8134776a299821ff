// src/lib.rs

pub mod cli;
pub mod config;
pub mod dsl;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod interactor;
pub mod listener;
pub mod logging;
pub mod model;
pub mod notifier;
pub mod plugin;
pub mod runner;
pub mod signals;
pub mod supervisor;
pub mod types;
pub mod watch;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::template::write_starter;
use crate::config::{Environment, Options};
use crate::fs::{FileSystem, RealFileSystem};
use crate::interactor::{ConsoleInteractor, Interactor, InteractorFactory};
use crate::listener::NotifyListener;
use crate::notifier::BackendNotifier;
use crate::plugin::PluginRegistry;
use crate::runner::TaskRunner;
use crate::supervisor::{Collaborators, Supervisor, SupervisorHandle};
use crate::types::ConsoleCommand;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - the options snapshot and the captured environment
/// - the supervisor and its collaborators (listener, notifier, runner,
///   console)
/// - signal handling (installed by setup)
/// - the main loop executing console commands until the supervisor stops
pub async fn run(args: CliArgs) -> Result<()> {
    let env = Environment::capture()?;
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    if args.init {
        let path = env.primary_config();
        write_starter(fs.as_ref(), &path)?;
        return Ok(());
    }

    let options = Options::from_cli(&args, env)?;

    if args.dry_run {
        return dry_run(options, fs);
    }

    let (console_tx, mut console_rx) = mpsc::unbounded_channel::<ConsoleCommand>();
    let interactor: InteractorFactory = Box::new(move || {
        Box::new(ConsoleInteractor::new(console_tx.clone())) as Box<dyn Interactor>
    });

    let supervisor = Supervisor::new(Collaborators {
        listener: Box::new(NotifyListener::new()),
        notifier: Box::new(BackendNotifier::new().with_command_logging(options.debug)),
        runner: Box::new(TaskRunner::new()),
        interactor: Some(interactor),
        fs,
        registry: PluginRegistry::builtin(),
    });
    let handle = SupervisorHandle::new(supervisor);

    // Setup and start block on the supervisor lock and on plugin hooks.
    {
        let handle = handle.clone();
        tokio::task::spawn_blocking(move || {
            handle.setup(options)?;
            handle.start()
        })
        .await??;
    }
    info!("Watchguard is now watching at {:?}", handle.lock().watchdirs());

    loop {
        tokio::select! {
            Some(command) = console_rx.recv() => {
                debug!(?command, "console command");
                let handle = handle.clone();
                tokio::task::spawn_blocking(move || handle.execute(command)).await?;
            }
            _ = handle.wait_stopped() => break,
        }
    }

    if let Some(failure) = handle.failure() {
        anyhow::bail!("stopped after a fatal error: {failure}");
    }
    Ok(())
}

/// Evaluate the configuration and print what it declares. Nothing is
/// watched or run.
fn dry_run(options: Options, fs: Arc<dyn FileSystem>) -> Result<()> {
    let mut supervisor = Supervisor::new(Collaborators {
        listener: Box::new(NotifyListener::new()),
        notifier: Box::new(BackendNotifier::new()),
        runner: Box::new(TaskRunner::new()),
        interactor: None,
        fs,
        registry: PluginRegistry::builtin(),
    });
    supervisor.prepare(options)?;
    supervisor.configure()?;
    print_dry_run(&supervisor);
    Ok(())
}

fn print_dry_run(supervisor: &Supervisor) {
    let model = supervisor.model();

    println!("watchguard dry-run");
    for source in supervisor.sources() {
        println!("  source: {source}");
    }
    for dir in supervisor.watchdirs() {
        println!("  watchdir: {}", dir.display());
    }
    if !model.ignore().is_empty() {
        println!("  ignore rules: yes");
    }
    println!();

    println!("groups ({}):", model.groups().len());
    for group in model.groups() {
        println!("  - {}", group.name());
        if group.halt_on_fail() {
            println!("      halt_on_fail: true");
        }
        for plugin in model.plugins().iter().filter(|p| p.group().name() == group.name()) {
            println!("      plugin: {}", plugin.name());
            let watch = plugin.profile().watch_patterns();
            if !watch.is_empty() {
                println!("        watch: {:?}", watch);
            }
            for (key, value) in plugin.options() {
                println!("        {key}: {value}");
            }
        }
    }

    let scope = model.scope();
    if scope.is_empty() {
        println!("scope: all");
    } else {
        println!("scope:");
        if !scope.groups.is_empty() {
            println!("  groups: {:?}", scope.group_names());
        }
        if !scope.plugins.is_empty() {
            println!("  plugins: {:?}", scope.plugin_names());
        }
    }

    debug!("dry-run complete (no execution)");
}
