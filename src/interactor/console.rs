// src/interactor/console.rs

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use crate::errors::Result;
use crate::interactor::Interactor;
use crate::types::ConsoleCommand;

pub const HELP: &str = "\
Commands:
  <enter>, all      run all plugins
  reload, r         re-evaluate the configuration
  pause, p          toggle file watching
  help, h, ?        show this help
  exit, quit, q     stop watchguard";

/// [`Interactor`] reading commands from stdin, one per line.
///
/// The reader thread blocks on stdin and cannot be cancelled; after `stop`
/// it simply drops whatever it reads next and exits.
#[derive(Debug)]
pub struct ConsoleInteractor {
    commands: UnboundedSender<ConsoleCommand>,
    attached: Arc<AtomicBool>,
}

impl ConsoleInteractor {
    pub fn new(commands: UnboundedSender<ConsoleCommand>) -> Self {
        Self {
            commands,
            attached: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl Interactor for ConsoleInteractor {
    fn start(&mut self) -> Result<()> {
        if self.is_attached() {
            return Ok(());
        }

        // A fresh flag per start, so a reader left over from a previous
        // start never becomes live again.
        let attached = Arc::new(AtomicBool::new(true));
        let reader_flag = Arc::clone(&attached);
        let commands = self.commands.clone();
        thread::Builder::new()
            .name("watchguard-console".to_string())
            .spawn(move || read_loop(reader_flag, commands))?;
        self.attached = attached;

        info!("console attached; type `help` for commands");
        Ok(())
    }

    fn stop(&mut self) {
        if self.attached.swap(false, Ordering::AcqRel) {
            debug!("console detached");
        }
    }

    fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    fn interrupt(&mut self) {
        // The half-typed line is discarded by the terminal on ^C.
        eprintln!();
        eprintln!("(interrupted; type `exit` to stop watchguard)");
        let _ = io::stderr().flush();
    }
}

fn read_loop(attached: Arc<AtomicBool>, commands: UnboundedSender<ConsoleCommand>) {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        if !attached.load(Ordering::Acquire) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("reading console input failed: {err}");
                break;
            }
        };
        match line.parse::<ConsoleCommand>() {
            Ok(ConsoleCommand::Help) => eprintln!("{HELP}"),
            Ok(command) => {
                if commands.send(command).is_err() {
                    break;
                }
            }
            Err(message) => eprintln!("{message}"),
        }
    }
    attached.store(false, Ordering::Release);
    debug!("console reader finished");
}

