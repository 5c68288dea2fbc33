use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use gowatch::errors::Result;
use gowatch::exec::{CommandSpec, ProcessBackend};
use gowatch::supervise::{Supervisor, SupervisorCore};
use gowatch::watch::ChangeEvent;

/// A supervisor wired to injectable change and interrupt sources.
///
/// Tests feed events through the two senders and observe the backend's
/// counters; the supervisor itself runs on a background task.
pub struct SupervisorHarness {
    pub change_tx: mpsc::Sender<ChangeEvent>,
    pub interrupt_tx: mpsc::Sender<()>,
    pub handle: JoinHandle<Result<()>>,
}

impl SupervisorHarness {
    pub fn start<B>(backend: B, window: Duration, restart_after_interrupt: bool) -> Self
    where
        B: ProcessBackend + 'static,
    {
        let (change_tx, change_rx) = mpsc::channel(64);
        let (interrupt_tx, interrupt_rx) = mpsc::channel(4);

        let core = SupervisorCore::new(restart_after_interrupt);
        let supervisor = Supervisor::new(
            core,
            backend,
            dummy_spec(),
            window,
            change_rx,
            interrupt_rx,
        );
        let handle = tokio::spawn(supervisor.run());

        Self {
            change_tx,
            interrupt_tx,
            handle,
        }
    }

    /// Inject one raw filesystem change.
    pub async fn change(&self) {
        self.change_tx
            .send(ChangeEvent)
            .await
            .expect("supervisor stopped receiving changes");
    }

    /// Inject one interrupt firing.
    pub async fn interrupt(&self) {
        self.interrupt_tx
            .send(())
            .await
            .expect("supervisor stopped receiving interrupts");
    }

    /// Join the supervisor, bounding how long the test may hang.
    pub async fn finish(self) -> Result<()> {
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("supervisor did not stop within 5 seconds")
            .expect("supervisor task panicked")
    }
}

fn dummy_spec() -> CommandSpec {
    CommandSpec {
        program: "true".to_string(),
        args: Vec::new(),
        cwd: PathBuf::from("."),
    }
}
