// src/supervise/runtime.rs

//! Async shell around the supervisor core.
//!
//! This owns the three event sources (child completion, raw filesystem
//! changes, interrupts) plus the at-most-one live [`ChildHandle`] and the
//! at-most-one open [`Debouncer`]. All decisions are delegated to
//! [`SupervisorCore`]; this struct only does IO and command execution.

use std::collections::VecDeque;
use std::fmt;
use std::future;
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::errors::Result;
use crate::exec::{ChildHandle, CommandSpec, ProcessBackend};
use crate::supervise::core::{StartTrigger, Step, SupervisorCommand, SupervisorCore};
use crate::supervise::{ExitOutcome, SupervisorEvent};
use crate::watch::{AggregatedChange, ChangeEvent, Debouncer};

/// Drives one child process in response to filesystem changes and
/// interrupts.
pub struct Supervisor<B: ProcessBackend> {
    core: SupervisorCore,
    backend: B,
    spec: CommandSpec,
    window: Duration,
    change_rx: mpsc::Receiver<ChangeEvent>,
    interrupt_rx: mpsc::Receiver<()>,
    child: Option<ChildHandle>,
    debouncer: Option<Debouncer>,
}

impl<B: ProcessBackend> fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("core", &self.core)
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(
        core: SupervisorCore,
        backend: B,
        spec: CommandSpec,
        window: Duration,
        change_rx: mpsc::Receiver<ChangeEvent>,
        interrupt_rx: mpsc::Receiver<()>,
    ) -> Self {
        Self {
            core,
            backend,
            spec,
            window,
            change_rx,
            interrupt_rx,
            child: None,
            debouncer: None,
        }
    }

    /// Main supervision loop.
    ///
    /// Returns `Ok(())` when a second interrupt requests a clean exit, or an
    /// error when a spawn fails or the watcher dies.
    pub async fn run(mut self) -> Result<()> {
        info!(
            window = ?self.window,
            command = %self.spec,
            "supervisor started; waiting out the initial quiet window"
        );
        self.debouncer = Some(Debouncer::start(self.window));

        loop {
            // Arbitration between the sources: completion is observed first
            // while a child is live (a terminated child has no branch here
            // at all), and an interrupt beats any pending change.
            let event = tokio::select! {
                biased;

                outcome = next_exit(&mut self.child), if self.child.is_some() => {
                    self.child = None;
                    SupervisorEvent::ChildExited(outcome)
                }

                Some(()) = self.interrupt_rx.recv() => SupervisorEvent::Interrupted,

                agg = next_settled(&mut self.debouncer), if self.debouncer.is_some() => {
                    self.debouncer = None;
                    SupervisorEvent::ChangeSettled(agg)
                }

                maybe_change = self.change_rx.recv() => match maybe_change {
                    Some(event) => {
                        // While a window is open, raw events only feed the
                        // debouncer; the core hears about the settled burst.
                        if let Some(debouncer) = &self.debouncer {
                            debouncer.observe(event);
                            continue;
                        }
                        SupervisorEvent::ChangeObserved
                    }
                    None => {
                        return Err(anyhow!("filesystem watcher stopped unexpectedly").into());
                    }
                },
            };

            debug!(state = ?self.core.state(), ?event, "supervisor event");
            let step = self.core.step(event);
            if !self.apply(step).await? {
                info!("exiting");
                return Ok(());
            }
        }
    }

    /// Execute the commands produced by one core step, in order.
    ///
    /// Commands that release a child feed the follow-up event straight back
    /// into the core, so the release always completes strictly before the
    /// next start.
    async fn apply(&mut self, step: Step) -> Result<bool> {
        let mut keep_running = step.keep_running;
        let mut commands = VecDeque::from(step.commands);

        while let Some(command) = commands.pop_front() {
            match command {
                SupervisorCommand::StartDebounce => {
                    debug!(window = ?self.window, "quiet window opened");
                    self.debouncer = Some(Debouncer::start(self.window));
                }

                SupervisorCommand::TerminateChild => {
                    if let Some(child) = self.child.take() {
                        child.terminate().await;
                        debug!("child terminated and released");
                    }
                    let step = self.core.step(SupervisorEvent::ChildReleased);
                    keep_running = keep_running && step.keep_running;
                    commands.extend(step.commands);
                }

                SupervisorCommand::StartChild(trigger) => {
                    match trigger {
                        StartTrigger::Initial => {
                            info!(command = %self.spec, "starting");
                        }
                        StartTrigger::Changes(count) => {
                            info!(command = %self.spec, changes = count, "restarting after settled changes");
                        }
                    }
                    let child = self.backend.spawn(&self.spec)?;
                    self.child = Some(child);
                    let step = self.core.step(SupervisorEvent::ChildStarted);
                    keep_running = keep_running && step.keep_running;
                    commands.extend(step.commands);
                }

                SupervisorCommand::ReportExit(outcome) => {
                    self.report(outcome);
                    info!("waiting for file changes");
                }

                SupervisorCommand::AnnounceInterrupt => {
                    info!("interrupt received (interrupt again to exit)");
                }

                SupervisorCommand::RecordPendingChange => {
                    info!("change detected; restarts are held after an interrupt (interrupt again to exit)");
                }
            }
        }

        Ok(keep_running)
    }

    fn report(&self, outcome: ExitOutcome) {
        match outcome {
            ExitOutcome::Success => info!("command exited successfully"),
            ExitOutcome::Failed(code) => error!(exit_code = code, "command failed"),
            ExitOutcome::Signaled => warn!("command was terminated by a signal"),
        }
    }
}

/// Resolve when the live child reports completion; pend forever without one.
async fn next_exit(child: &mut Option<ChildHandle>) -> ExitOutcome {
    match child.as_mut() {
        Some(child) => child.completed().await,
        None => future::pending().await,
    }
}

/// Resolve when the open window settles; pend forever without one.
async fn next_settled(debouncer: &mut Option<Debouncer>) -> AggregatedChange {
    match debouncer.as_mut() {
        Some(debouncer) => debouncer.settled().await,
        None => future::pending().await,
    }
}
