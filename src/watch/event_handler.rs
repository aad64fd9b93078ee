// src/watch/event_handler.rs

//! Turning a batch of changed paths into stage triggers.

use std::path::{Path, PathBuf};

use notify::event::{AccessKind, AccessMode, EventKind};
use tracing::{debug, warn};

use crate::fs::FileSystem;
use crate::stages::StageName;
use crate::watch::bindings::WatchTable;
use crate::watch::hash::{fingerprint_stage, FingerprintStore};
use crate::watch::path_utils::relative_str;

/// Whether a notify event can mean changed file contents.
///
/// Plain opens and reads are dropped; our own stages read sources all the
/// time.
pub fn is_content_change(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => true,
        EventKind::Access(AccessKind::Close(AccessMode::Write)) => true,
        _ => false,
    }
}

/// Stages to trigger for one change batch.
///
/// 1. Relativise every path against `root` (paths outside it are ignored).
/// 2. Collect the bound stages, each at most once.
/// 3. With a fingerprint store, drop stages whose bound files hash the same
///    as at their previous trigger.
pub fn stages_for_changes(
    fs: &dyn FileSystem,
    root: &Path,
    paths: &[PathBuf],
    table: &WatchTable,
    store: Option<&mut FingerprintStore>,
) -> Vec<StageName> {
    let rels: Vec<String> = paths
        .iter()
        .filter_map(|p| relative_str(root, p))
        .collect();
    debug!(?rels, "normalized batch paths");

    let candidates = table.stages_for_batch(rels.iter().map(String::as_str));

    let Some(store) = store else {
        return candidates;
    };

    candidates
        .into_iter()
        .filter(|stage| match fingerprint_stage(fs, root, table, *stage) {
            Ok(hash) => {
                let changed = store.update(*stage, hash);
                if !changed {
                    debug!(stage = %stage, "contents unchanged; skipping trigger");
                }
                changed
            }
            Err(err) => {
                warn!(stage = %stage, error = %err, "fingerprint failed; triggering anyway");
                true
            }
        })
        .collect()
}

/// Seed `store` with the current fingerprint of every bound stage so the
/// first save of an untouched file does not trigger a rebuild.
pub fn prime_fingerprints(
    fs: &dyn FileSystem,
    root: &Path,
    table: &WatchTable,
    store: &mut FingerprintStore,
) {
    for stage in table.bound_stages() {
        match fingerprint_stage(fs, root, table, stage) {
            Ok(hash) => {
                store.update(stage, hash);
            }
            Err(err) => warn!(stage = %stage, error = %err, "could not prime fingerprint"),
        }
    }
}
