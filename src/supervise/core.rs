// src/supervise/core.rs

//! Pure supervisor state machine.
//!
//! This module contains a synchronous, deterministic core that consumes
//! [`SupervisorEvent`]s and produces:
//! - an updated [`SupervisorState`]
//! - a list of commands describing what the IO shell should do next
//!
//! The async shell (`supervise::runtime::Supervisor`) is responsible for:
//! - reading events from channels
//! - spawning and terminating the child through a `ProcessBackend`
//! - driving the debouncer
//!
//! The core has **no** channels, no Tokio types, and performs no IO, so the
//! whole lifecycle can be unit tested synchronously.

use crate::supervise::{ExitOutcome, SupervisorEvent, SupervisorState};

/// What caused a start or restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartTrigger {
    /// The initial launch, after the startup quiet window.
    Initial,
    /// A settled burst of `count` filesystem changes.
    Changes(u32),
}

/// Command produced by the core, executed in order by the IO shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Open a fresh quiet window for the burst that was just observed.
    StartDebounce,
    /// Kill the current child and wait until its resources are released.
    TerminateChild,
    /// Spawn a fresh child for the configured command.
    StartChild(StartTrigger),
    /// Report how the child exited.
    ReportExit(ExitOutcome),
    /// Tell the operator the interrupt was taken.
    AnnounceInterrupt,
    /// A change arrived after an interrupt while restarts are held.
    RecordPendingChange,
}

/// Decision returned by the core after handling a single event.
#[derive(Debug, Clone)]
pub struct Step {
    /// Commands the IO shell should execute next.
    pub commands: Vec<SupervisorCommand>,
    /// Whether the outer supervisor loop should keep running.
    pub keep_running: bool,
}

impl Step {
    fn next(commands: Vec<SupervisorCommand>) -> Self {
        Self {
            commands,
            keep_running: true,
        }
    }

    fn exit() -> Self {
        Self {
            commands: Vec::new(),
            keep_running: false,
        }
    }
}

/// Why the current child is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Change,
    Interrupt,
}

/// Pure supervisor core state.
#[derive(Debug)]
pub struct SupervisorCore {
    state: SupervisorState,
    /// When false, a change after an interrupt is recorded but the next
    /// cycle never starts on its own.
    restart_after_interrupt: bool,
    stopping_for: Option<StopReason>,
    change_pending: bool,
    initial: bool,
}

impl SupervisorCore {
    /// The core starts in `Debouncing`: the very first launch honours the
    /// same quiet window as any later restart, with a count of one.
    pub fn new(restart_after_interrupt: bool) -> Self {
        Self {
            state: SupervisorState::Debouncing,
            restart_after_interrupt,
            stopping_for: None,
            change_pending: false,
            initial: true,
        }
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Handle a single event, updating state and returning the commands for
    /// the IO shell.
    pub fn step(&mut self, event: SupervisorEvent) -> Step {
        use crate::supervise::core::SupervisorCommand as Cmd;
        use crate::supervise::{SupervisorEvent as Ev, SupervisorState as St};

        match (self.state, event) {
            (St::Debouncing, Ev::ChangeSettled(agg)) => {
                self.state = St::Starting;
                let trigger = if self.initial {
                    self.initial = false;
                    StartTrigger::Initial
                } else {
                    StartTrigger::Changes(agg.count)
                };
                Step::next(vec![Cmd::StartChild(trigger)])
            }

            (St::Starting, Ev::ChildStarted) => {
                self.state = St::Running;
                Step::next(Vec::new())
            }

            (St::Running, Ev::ChildExited(outcome)) => {
                self.state = St::Idle;
                Step::next(vec![Cmd::ReportExit(outcome)])
            }

            (St::Running, Ev::ChangeObserved) => {
                // The kill happens right away; only the restart decision
                // waits for the window to settle.
                self.state = St::Terminating;
                self.stopping_for = Some(StopReason::Change);
                Step::next(vec![Cmd::StartDebounce, Cmd::TerminateChild])
            }

            (St::Running, Ev::Interrupted) => {
                self.state = St::Terminating;
                self.stopping_for = Some(StopReason::Interrupt);
                Step::next(vec![Cmd::TerminateChild, Cmd::AnnounceInterrupt])
            }

            (St::Terminating, Ev::ChildReleased) => {
                match self.stopping_for.take() {
                    Some(StopReason::Change) => self.state = St::Debouncing,
                    Some(StopReason::Interrupt) | None => self.state = St::ShuttingDown,
                }
                Step::next(Vec::new())
            }

            (St::Terminating, Ev::Interrupted) => {
                if self.stopping_for == Some(StopReason::Interrupt) {
                    return Step::exit();
                }
                self.stopping_for = Some(StopReason::Interrupt);
                Step::next(vec![Cmd::AnnounceInterrupt])
            }

            (St::Idle, Ev::ChangeObserved) => {
                self.state = St::Debouncing;
                Step::next(vec![Cmd::StartDebounce])
            }

            (St::Idle | St::Debouncing, Ev::Interrupted) => {
                self.state = St::ShuttingDown;
                Step::next(vec![Cmd::AnnounceInterrupt])
            }

            (St::ShuttingDown, Ev::Interrupted) => Step::exit(),

            (St::ShuttingDown, Ev::ChangeObserved) => {
                if self.restart_after_interrupt {
                    self.state = St::Debouncing;
                    Step::next(vec![Cmd::StartDebounce])
                } else if !self.change_pending {
                    self.change_pending = true;
                    Step::next(vec![Cmd::RecordPendingChange])
                } else {
                    Step::next(Vec::new())
                }
            }

            // Events racing against a state they no longer apply to are
            // dropped; the shell's channel draining makes these rare but
            // possible.
            (_, _) => Step::next(Vec::new()),
        }
    }
}
