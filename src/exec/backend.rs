// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! directly. This makes it easy to swap in a fake backend in tests while
//! keeping the production spawn path in [`child`](crate::exec::child).
//!
//! - `RealProcessBackend` is the default implementation used by `gowatch`.
//! - Tests can provide their own `ProcessBackend` that hands out scripted
//!   [`ChildHandle`]s without touching the OS.

use crate::errors::Result;
use crate::exec::child::{self, ChildHandle};
use crate::exec::CommandSpec;

/// Trait abstracting how child processes are started.
pub trait ProcessBackend: Send {
    /// Start one child for `spec`.
    ///
    /// A returned error means the command could not be launched at all;
    /// the supervisor treats that as fatal.
    fn spawn(&mut self, spec: &CommandSpec) -> Result<ChildHandle>;
}

/// Real process backend used in production.
pub struct RealProcessBackend;

impl ProcessBackend for RealProcessBackend {
    fn spawn(&mut self, spec: &CommandSpec) -> Result<ChildHandle> {
        child::spawn_child(spec)
    }
}
