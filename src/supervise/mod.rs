// src/supervise/mod.rs

//! Supervision of the single child process.
//!
//! This module ties together:
//! - the quiet-window debouncer output
//! - the child process lifecycle
//! - the main loop that reacts to:
//!   - filesystem changes
//!   - child completion
//!   - interrupt signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use crate::watch::AggregatedChange;

/// Lifecycle phase of the supervisor loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    /// No child; waiting for the next change.
    Idle,
    /// A child spawn is in flight.
    Starting,
    /// Exactly one child is alive.
    Running,
    /// A quiet window is open; the next start waits for it to settle.
    Debouncing,
    /// The current child is being torn down.
    Terminating,
    /// An interrupt was taken; the next interrupt exits the process.
    ShuttingDown,
}

/// How a child process left the `Running` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitOutcome {
    /// Exit code 0.
    Success,
    /// Nonzero exit code, reported verbatim.
    Failed(i32),
    /// Killed by a signal the supervisor did not send.
    Signaled,
}

/// Events flowing into the supervisor core.
#[derive(Debug, Clone, Copy)]
pub enum SupervisorEvent {
    /// A fresh child was spawned successfully.
    ChildStarted,
    /// The child exited on its own.
    ChildExited(ExitOutcome),
    /// The previous child's OS resources have been released.
    ChildReleased,
    /// First raw change of a new burst.
    ChangeObserved,
    /// The burst settled after a full quiet window.
    ChangeSettled(AggregatedChange),
    /// The operator requested an interrupt.
    Interrupted,
}

pub mod core;
pub mod runtime;

pub use self::core::{StartTrigger, Step, SupervisorCommand, SupervisorCore};
pub use runtime::Supervisor;
