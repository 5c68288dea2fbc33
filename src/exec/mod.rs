// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the configured `go`
//! command, using `tokio::process::Command`, and reporting back to the
//! supervisor via the child's completion channel.
//!
//! - [`command`] composes the command line for the selected mode.
//! - [`child`] owns a single spawned process: its waiter task, completion
//!   channel and termination request.
//! - [`backend`] provides the `ProcessBackend` trait and a concrete
//!   `RealProcessBackend` that the supervisor uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod child;
pub mod command;

pub use backend::{ProcessBackend, RealProcessBackend};
pub use child::ChildHandle;
pub use command::CommandSpec;
