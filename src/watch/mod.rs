// src/watch/mod.rs

//! File watching and change coalescing.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Filtering out excluded paths and non-mutating event kinds.
//! - Collapsing bursts of raw events into one settled change via the
//!   [`Debouncer`].
//!
//! It does **not** know about the supervised process; it only turns
//! filesystem activity into change signals for the supervisor loop.

pub mod debounce;
pub mod filter;
pub mod watcher;

/// Marker for one raw filesystem mutation under the watched root.
///
/// The supervisor never inspects anything beyond "something changed".
#[derive(Debug, Clone, Copy, Default)]
pub struct ChangeEvent;

pub use debounce::{AggregatedChange, Debouncer};
pub use filter::ChangeFilter;
pub use watcher::{WatcherHandle, spawn_watcher};
