// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod lookup;
pub mod supervise;
pub mod watch;

use tokio::sync::mpsc;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::Config;
use crate::errors::Result;
use crate::exec::{CommandSpec, RealProcessBackend};
use crate::supervise::{Supervisor, SupervisorCore};
use crate::watch::ChangeFilter;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config resolution (flags + entry-file lookup)
/// - the filesystem watcher
/// - Ctrl-C handling
/// - the supervisor loop
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = Config::from_args(&args)?;
    let spec = CommandSpec::from_config(&cfg)?;
    debug!(?cfg, "resolved configuration");

    let (change_tx, change_rx) = mpsc::channel(64);
    let filter = ChangeFilter::new(&cfg.excludes)?;
    let _watcher = watch::spawn_watcher(cfg.project.clone(), filter, change_tx)?;

    let interrupt_rx = spawn_interrupt_listener();

    let core = SupervisorCore::new(!cfg.hold_after_interrupt);
    let supervisor = Supervisor::new(
        core,
        RealProcessBackend,
        spec,
        cfg.window,
        change_rx,
        interrupt_rx,
    );
    supervisor.run().await
}

/// Ctrl-C → supervisor interrupt, re-armed after every delivery so the
/// second firing is observed as well.
fn spawn_interrupt_listener() -> mpsc::Receiver<()> {
    let (tx, rx) = mpsc::channel(4);
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("gowatch: failed to listen for Ctrl+C: {e}");
                return;
            }
            if tx.send(()).await.is_err() {
                return;
            }
        }
    });
    rx
}
