// tests/supervisor_runtime.rs

//! End-to-end supervisor loop tests against a fake process backend.
//!
//! Real time, short windows; every test is bounded by the harness timeout.

mod common;
use crate::common::init_tracing;

use std::time::Duration;

use gowatch::supervise::ExitOutcome;
use gowatch_test_utils::fake_backend::{FakeChildPlan, FakeProcessBackend};
use gowatch_test_utils::harness::SupervisorHarness;

const WINDOW: Duration = Duration::from_millis(80);

/// Sleep long enough for an open quiet window to settle.
async fn settle() {
    tokio::time::sleep(WINDOW * 3).await;
}

#[tokio::test]
async fn initial_start_honours_the_quiet_window() {
    init_tracing();

    let backend = FakeProcessBackend::new([FakeChildPlan::RunUntilTerminated]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(
        counters.starts(),
        0,
        "child must not start before the quiet window elapses"
    );

    settle().await;
    assert_eq!(counters.starts(), 1);

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn change_kills_the_child_then_restarts_after_the_window() {
    init_tracing();

    let backend = FakeProcessBackend::new([
        FakeChildPlan::RunUntilTerminated,
        FakeChildPlan::RunUntilTerminated,
    ]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    settle().await;
    assert_eq!(counters.starts(), 1);

    harness.change().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    // the kill is immediate; the restart still waits for the window
    assert_eq!(counters.releases(), 1);
    assert_eq!(counters.starts(), 1);

    harness.change().await;
    settle().await;
    assert_eq!(counters.starts(), 2);
    assert_eq!(counters.max_alive(), 1, "never two children at once");

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn natural_exit_waits_for_the_next_change() {
    init_tracing();

    let backend = FakeProcessBackend::new([
        FakeChildPlan::Exit(ExitOutcome::Failed(2)),
        FakeChildPlan::RunUntilTerminated,
    ]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    settle().await;
    assert_eq!(counters.starts(), 1);
    assert_eq!(counters.alive(), 0, "first child exited on its own");

    // nothing restarts until a change arrives
    tokio::time::sleep(WINDOW * 2).await;
    assert_eq!(counters.starts(), 1);

    harness.change().await;
    settle().await;
    assert_eq!(counters.starts(), 2);

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn successful_exit_leaves_the_supervisor_idle() {
    init_tracing();

    let backend = FakeProcessBackend::new([FakeChildPlan::ExitAfter(
        Duration::from_millis(30),
        ExitOutcome::Success,
    )]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    settle().await;
    assert_eq!(counters.starts(), 1);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(counters.alive(), 0, "child finished on its own");
    assert_eq!(counters.starts(), 1, "a natural exit does not restart anything");

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn double_interrupt_during_the_initial_window_exits_cleanly() {
    init_tracing();

    let backend = FakeProcessBackend::new([]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.starts(), 0);
}

#[tokio::test]
async fn change_after_interrupt_restarts_by_default() {
    init_tracing();

    let backend = FakeProcessBackend::new([
        FakeChildPlan::RunUntilTerminated,
        FakeChildPlan::RunUntilTerminated,
    ]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    settle().await;
    harness.interrupt().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(counters.releases(), 1);

    harness.change().await;
    settle().await;
    assert_eq!(counters.starts(), 2);

    harness.interrupt().await;
    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn change_after_interrupt_is_held_when_configured() {
    init_tracing();

    let backend = FakeProcessBackend::new([FakeChildPlan::RunUntilTerminated]);
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, false);

    settle().await;
    harness.interrupt().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(counters.releases(), 1);

    harness.change().await;
    tokio::time::sleep(WINDOW * 3).await;
    assert_eq!(counters.starts(), 1, "held changes must not restart the child");

    harness.interrupt().await;
    harness.finish().await.expect("clean exit");
    assert_eq!(counters.releases(), counters.starts());
}

#[tokio::test]
async fn spawn_failure_stops_the_supervisor() {
    init_tracing();

    let mut backend = FakeProcessBackend::new([]);
    backend.fail_next_spawn();
    let counters = backend.counters();
    let harness = SupervisorHarness::start(backend, WINDOW, true);

    let result = harness.finish().await;
    assert!(result.is_err(), "a failed spawn is fatal");
    assert_eq!(counters.starts(), 0);
}
