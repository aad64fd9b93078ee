// src/watch/watcher.rs

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::fs::FileSystem;
use crate::watch::bindings::WatchTable;
use crate::watch::event_handler::{is_content_change, prime_fingerprints, stages_for_changes};
use crate::watch::hash::FingerprintStore;

#[derive(Debug, Clone, Copy)]
pub struct WatchOptions {
    /// Events arriving within this window after the first one form a batch.
    pub debounce: Duration,
    /// Suppress triggers whose bound files are unchanged.
    pub use_hash: bool,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(100),
            use_hash: true,
        }
    }
}

/// Keeps the `notify` watcher and its batching task alive. Dropping the handle
/// stops watching.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish_non_exhaustive()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Watch `root` recursively and send `StageTriggered` events for every
/// stage a change batch is bound to.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    table: WatchTable,
    fs: Arc<dyn FileSystem>,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    options: WatchOptions,
) -> Result<WatcherHandle> {
    let root = root.into();
    let root = root.canonicalize().unwrap_or(root);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                // Only fails once the batching task is gone.
                let _ = event_tx.send(event);
            }
            Err(err) => {
                eprintln!("assetpipe: file watch error: {err}");
            }
        },
        Config::default(),
    )?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!("file watcher started on {:?}", root);

    let mut store = options.use_hash.then(FingerprintStore::new);
    if let Some(store) = store.as_mut() {
        prime_fingerprints(fs.as_ref(), &root, &table, store);
    }

    let task = tokio::spawn(async move {
        while let Some(first) = event_rx.recv().await {
            let mut paths = Vec::new();
            collect_paths(first, &mut paths);

            let window = tokio::time::sleep(options.debounce);
            tokio::pin!(window);
            loop {
                tokio::select! {
                    _ = &mut window => break,
                    next = event_rx.recv() => match next {
                        Some(event) => collect_paths(event, &mut paths),
                        None => break,
                    },
                }
            }

            if paths.is_empty() {
                continue;
            }
            paths.sort();
            paths.dedup();

            let stages = stages_for_changes(fs.as_ref(), &root, &paths, &table, store.as_mut());
            for stage in stages {
                info!(stage = %stage, "source change; triggering stage");
                let event = RuntimeEvent::StageTriggered {
                    stage,
                    reason: TriggerReason::FileWatch,
                };
                if runtime_tx.send(event).await.is_err() {
                    warn!("runtime channel closed; stopping watcher");
                    return;
                }
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        task,
    })
}

fn collect_paths(event: Event, paths: &mut Vec<PathBuf>) {
    if is_content_change(&event.kind) {
        paths.extend(event.paths);
    }
}
