use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::oneshot;

use gowatch::errors::{GowatchError, Result};
use gowatch::exec::{ChildHandle, CommandSpec, ProcessBackend};
use gowatch::supervise::ExitOutcome;

/// Scripted behaviour for one fake child.
#[derive(Debug, Clone, Copy)]
pub enum FakeChildPlan {
    /// Report this outcome as soon as the child starts.
    Exit(ExitOutcome),
    /// Report this outcome after the given delay, unless terminated first.
    ExitAfter(Duration, ExitOutcome),
    /// Keep running until the supervisor terminates the child.
    RunUntilTerminated,
}

/// Shared counters recording what the backend observed.
///
/// `releases` counts waiter tasks that fully wound down, i.e. children whose
/// resources were given back — naturally exited or killed alike.
#[derive(Debug, Default)]
pub struct BackendCounters {
    starts: AtomicUsize,
    releases: AtomicUsize,
    alive: AtomicUsize,
    max_alive: AtomicUsize,
}

impl BackendCounters {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn alive(&self) -> usize {
        self.alive.load(Ordering::SeqCst)
    }

    /// Largest number of children alive at the same time.
    pub fn max_alive(&self) -> usize {
        self.max_alive.load(Ordering::SeqCst)
    }
}

/// A process backend that fakes child processes with scripted lifecycles.
///
/// Plans are consumed in spawn order; once they run out, every further child
/// behaves like [`FakeChildPlan::RunUntilTerminated`].
pub struct FakeProcessBackend {
    plans: VecDeque<FakeChildPlan>,
    fail_next_spawn: bool,
    counters: Arc<BackendCounters>,
}

impl FakeProcessBackend {
    pub fn new(plans: impl IntoIterator<Item = FakeChildPlan>) -> Self {
        Self {
            plans: plans.into_iter().collect(),
            fail_next_spawn: false,
            counters: Arc::new(BackendCounters::default()),
        }
    }

    /// Make the next `spawn` call fail like a missing executable.
    pub fn fail_next_spawn(&mut self) {
        self.fail_next_spawn = true;
    }

    pub fn counters(&self) -> Arc<BackendCounters> {
        Arc::clone(&self.counters)
    }
}

impl ProcessBackend for FakeProcessBackend {
    fn spawn(&mut self, spec: &CommandSpec) -> Result<ChildHandle> {
        if self.fail_next_spawn {
            self.fail_next_spawn = false;
            return Err(GowatchError::Spawn {
                command: spec.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "fake spawn failure"),
            });
        }

        let plan = self
            .plans
            .pop_front()
            .unwrap_or(FakeChildPlan::RunUntilTerminated);

        self.counters.starts.fetch_add(1, Ordering::SeqCst);
        let alive = self.counters.alive.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_alive.fetch_max(alive, Ordering::SeqCst);

        let (completion_tx, completion_rx) = oneshot::channel();
        let (terminate_tx, terminate_rx) = oneshot::channel();

        let counters = Arc::clone(&self.counters);
        let waiter = tokio::spawn(async move {
            run_plan(plan, completion_tx, terminate_rx).await;
            counters.alive.fetch_sub(1, Ordering::SeqCst);
            counters.releases.fetch_add(1, Ordering::SeqCst);
        });

        Ok(ChildHandle::from_parts(completion_rx, terminate_tx, waiter))
    }
}

async fn run_plan(
    plan: FakeChildPlan,
    completion_tx: oneshot::Sender<ExitOutcome>,
    mut terminate_rx: oneshot::Receiver<()>,
) {
    match plan {
        FakeChildPlan::Exit(outcome) => {
            let _ = completion_tx.send(outcome);
        }
        FakeChildPlan::ExitAfter(delay, outcome) => {
            tokio::select! {
                _ = tokio::time::sleep(delay) => {
                    let _ = completion_tx.send(outcome);
                }
                _ = &mut terminate_rx => {}
            }
        }
        FakeChildPlan::RunUntilTerminated => {
            let _ = terminate_rx.await;
        }
    }
}
