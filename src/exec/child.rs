// src/exec/child.rs

//! A single supervised child process.
//!
//! Spawning returns a [`ChildHandle`] backed by one waiter task. The waiter
//! either observes the process exit on its own and delivers the outcome on a
//! single-use completion channel, or receives a termination request, kills
//! the process and reaps it **without** delivering a completion — a kill the
//! supervisor asked for is not an exit to report.
//!
//! [`ChildHandle::terminate`] consumes the handle and joins the waiter, so
//! when it returns the OS resources of this child are fully released.

use std::process::Stdio;

use tokio::process::Command;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::errors::{GowatchError, Result};
use crate::exec::CommandSpec;
use crate::supervise::ExitOutcome;

pub struct ChildHandle {
    completion: oneshot::Receiver<ExitOutcome>,
    terminate: Option<oneshot::Sender<()>>,
    waiter: JoinHandle<()>,
}

impl std::fmt::Debug for ChildHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChildHandle").finish_non_exhaustive()
    }
}

impl ChildHandle {
    /// Assemble a handle from raw channels.
    ///
    /// Production code goes through [`spawn_child`]; fake backends use this
    /// to stand in for a real process.
    pub fn from_parts(
        completion: oneshot::Receiver<ExitOutcome>,
        terminate: oneshot::Sender<()>,
        waiter: JoinHandle<()>,
    ) -> Self {
        Self {
            completion,
            terminate: Some(terminate),
            waiter,
        }
    }

    /// Wait for the child to exit on its own.
    pub async fn completed(&mut self) -> ExitOutcome {
        match (&mut self.completion).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!("child waiter stopped without reporting an exit status");
                ExitOutcome::Failed(-1)
            }
        }
    }

    /// Kill the child and wait until its OS resources are released.
    ///
    /// Safe to call on a child that already exited: the waiter is gone, the
    /// request send fails, and the join returns immediately.
    pub async fn terminate(mut self) {
        if let Some(tx) = self.terminate.take() {
            // Err means the waiter already finished; the child is gone.
            let _ = tx.send(());
        }
        if let Err(err) = self.waiter.await {
            warn!(error = %err, "child waiter task failed during termination");
        }
    }
}

/// Spawn `spec` with inherited standard streams.
pub(crate) fn spawn_child(spec: &CommandSpec) -> Result<ChildHandle> {
    info!(command = %spec, cwd = %spec.cwd.display(), "spawning child process");

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .current_dir(&spec.cwd)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| GowatchError::Spawn {
        command: spec.to_string(),
        source,
    })?;

    let (completion_tx, completion_rx) = oneshot::channel();
    let (terminate_tx, mut terminate_rx) = oneshot::channel::<()>();
    let command = spec.to_string();

    let waiter = tokio::spawn(async move {
        tokio::select! {
            status = child.wait() => {
                let outcome = match status {
                    Ok(status) if status.success() => ExitOutcome::Success,
                    Ok(status) => match status.code() {
                        Some(code) => ExitOutcome::Failed(code),
                        None => ExitOutcome::Signaled,
                    },
                    Err(err) => {
                        warn!(command = %command, error = %err, "failed waiting for child process");
                        ExitOutcome::Failed(-1)
                    }
                };
                // the receiver may already be gone if the supervisor lost
                // interest in this instance; that is fine
                let _ = completion_tx.send(outcome);
            }
            _ = &mut terminate_rx => {
                // kill sends the signal and reaps the process
                if let Err(err) = child.kill().await {
                    warn!(command = %command, error = %err, "failed to kill child; treating it as already exited");
                }
                // no completion is sent for a supervisor-requested kill
            }
        }
    });

    Ok(ChildHandle::from_parts(completion_rx, terminate_tx, waiter))
}
