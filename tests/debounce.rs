// tests/debounce.rs

//! Timing behaviour of the quiet-window debouncer.

use std::time::Duration;

use tokio::time::timeout;

use gowatch::watch::{ChangeEvent, Debouncer};

#[tokio::test]
async fn single_trigger_settles_with_count_one() {
    let mut debouncer = Debouncer::start(Duration::from_millis(50));

    let agg = timeout(Duration::from_secs(2), debouncer.settled())
        .await
        .expect("window never settled");
    assert_eq!(agg.count, 1);
}

#[tokio::test]
async fn a_burst_settles_once_with_the_full_count() {
    let mut debouncer = Debouncer::start(Duration::from_millis(80));

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        debouncer.observe(ChangeEvent);
    }

    let agg = timeout(Duration::from_secs(2), debouncer.settled())
        .await
        .expect("window never settled");
    assert_eq!(agg.count, 5, "first event plus four observed events");
}

#[tokio::test]
async fn every_event_re_arms_the_window() {
    let mut debouncer = Debouncer::start(Duration::from_millis(200));

    tokio::time::sleep(Duration::from_millis(120)).await;
    debouncer.observe(ChangeEvent);

    // the original deadline has passed by now, but the observe pushed it out
    let early = timeout(Duration::from_millis(120), debouncer.settled()).await;
    assert!(early.is_err(), "window must re-arm on every event");

    let agg = timeout(Duration::from_secs(2), debouncer.settled())
        .await
        .expect("window never settled");
    assert_eq!(agg.count, 2);
}

#[tokio::test]
async fn bursts_separated_by_more_than_the_window_settle_separately() {
    // one window per burst: the supervisor opens a fresh one when a raw
    // event arrives with no window pending
    let mut first = Debouncer::start(Duration::from_millis(40));
    let agg = timeout(Duration::from_secs(2), first.settled())
        .await
        .expect("first burst never settled");
    assert_eq!(agg.count, 1);

    let mut second = Debouncer::start(Duration::from_millis(40));
    second.observe(ChangeEvent);
    let agg = timeout(Duration::from_secs(2), second.settled())
        .await
        .expect("second burst never settled");
    assert_eq!(agg.count, 2);
}

#[tokio::test]
async fn observes_after_settling_are_discarded() {
    let mut debouncer = Debouncer::start(Duration::from_millis(30));

    let agg = timeout(Duration::from_secs(2), debouncer.settled())
        .await
        .expect("window never settled");
    assert_eq!(agg.count, 1);

    // the burst is over; late events must neither panic nor block
    debouncer.observe(ChangeEvent);
}
