// src/watch/debounce.rs

//! Quiet-window aggregation of raw change events.
//!
//! A [`Debouncer`] collapses one burst of [`ChangeEvent`]s into a single
//! [`AggregatedChange`]: the window re-arms on every observed event, and the
//! burst settles once no event has arrived for the whole window.
//!
//! Internally two tasks cooperate:
//! - a timer task owning the deadline, which fires once it elapses,
//! - an accumulator task counting observed events and re-arming the timer.
//!
//! A re-arm request that loses the race against the timer firing is dropped;
//! the accumulator then settles with the count it has.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant};

use crate::watch::ChangeEvent;

/// A settled burst of filesystem changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregatedChange {
    /// Number of raw change events observed in the burst, at least 1.
    pub count: u32,
}

/// Handle to one in-flight quiet window.
///
/// A window covers exactly one burst; the next burst gets a fresh
/// `Debouncer`.
#[derive(Debug)]
pub struct Debouncer {
    events: mpsc::UnboundedSender<ChangeEvent>,
    settled: oneshot::Receiver<AggregatedChange>,
}

impl Debouncer {
    /// Open a quiet window.
    ///
    /// The event that opened the burst (or the initial launch) is already
    /// counted, so the count starts at 1.
    pub fn start(window: Duration) -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (settled_tx, settled_rx) = oneshot::channel();

        tokio::spawn(accumulate(event_rx, settled_tx, window));

        Self {
            events: event_tx,
            settled: settled_rx,
        }
    }

    /// Feed one more raw event into the open window.
    ///
    /// Events arriving after the window settled are discarded.
    pub fn observe(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    /// Wait until the window settles.
    pub async fn settled(&mut self) -> AggregatedChange {
        match (&mut self.settled).await {
            Ok(agg) => agg,
            // the accumulator only drops its sender if it died; treat the
            // burst as a single change rather than stalling the supervisor
            Err(_) => AggregatedChange { count: 1 },
        }
    }
}

/// Count incoming events and re-arm the timer for each one.
async fn accumulate(
    mut events: mpsc::UnboundedReceiver<ChangeEvent>,
    settled_tx: oneshot::Sender<AggregatedChange>,
    window: Duration,
) {
    let (reset_tx, reset_rx) = mpsc::channel::<()>(1);
    let (fired_tx, mut fired_rx) = oneshot::channel::<()>();

    tokio::spawn(run_timer(window, reset_rx, fired_tx));

    let mut count: u32 = 1;
    loop {
        tokio::select! {
            maybe_event = events.recv() => match maybe_event {
                Some(_) => {
                    count = count.saturating_add(1);
                    // a full channel means a re-arm is already pending; a
                    // closed one means the timer has fired — drop either way
                    let _ = reset_tx.try_send(());
                }
                // handle dropped: let the timer wind down on its own
                None => return,
            },
            _ = &mut fired_rx => {
                let _ = settled_tx.send(AggregatedChange { count });
                return;
            }
        }
    }
}

/// Own the deadline; fire once it elapses with no pending re-arm.
async fn run_timer(
    window: Duration,
    mut reset_rx: mpsc::Receiver<()>,
    fired_tx: oneshot::Sender<()>,
) {
    let mut deadline = Instant::now() + window;
    loop {
        tokio::select! {
            _ = time::sleep_until(deadline) => {
                let _ = fired_tx.send(());
                return;
            }
            request = reset_rx.recv() => match request {
                Some(()) => deadline = Instant::now() + window,
                None => return,
            },
        }
    }
}
