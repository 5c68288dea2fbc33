// src/watch/watcher.rs

use std::path::PathBuf;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::{GowatchError, Result};
use crate::watch::filter::ChangeFilter;
use crate::watch::ChangeEvent;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle will stop file watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Spawn a filesystem watcher observing `root` recursively.
///
/// Every relevant event is forwarded to `change_tx` as one opaque
/// [`ChangeEvent`]; pure access notifications and excluded paths are
/// dropped before they reach the supervisor.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    filter: ChangeFilter,
    change_tx: mpsc::Sender<ChangeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("gowatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("gowatch: file watch error: {err}");
            }
        },
        Config::default(),
    )
    .map_err(|source| GowatchError::Watch {
        path: root.clone(),
        source,
    })?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .map_err(|source| GowatchError::Watch {
            path: root.clone(),
            source,
        })?;

    info!("file watcher started on {:?}", root);

    // Async task that consumes notify events and forwards change markers to
    // the supervisor.
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            if matches!(event.kind, EventKind::Access(_)) {
                continue;
            }
            let Some(path) = event.paths.iter().find(|p| !filter.ignores(&root, p)) else {
                continue;
            };
            debug!(?path, kind = ?event.kind, "relevant filesystem event");

            if change_tx.send(ChangeEvent).await.is_err() {
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle { _inner: watcher })
}
