// src/watch/hash.rs

//! Content fingerprints for watch-triggered stages.
//!
//! A stage's fingerprint covers the relative path and contents of every
//! source file its bindings match, so edits, additions, removals and renames
//! all change it. Fingerprints live in memory for the life of the watcher.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use blake3::Hasher;
use tracing::debug;

use crate::fs::FileSystem;
use crate::stages::select::select_files;
use crate::stages::StageName;
use crate::watch::bindings::WatchTable;

/// Hash of a single file's contents.
pub fn compute_file_hash(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let bytes = fs.read(path)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

/// Hash over `(rel_path, file_hash)` pairs; callers pass them sorted by path.
pub fn compute_aggregate_hash(entries: &[(String, String)]) -> String {
    let mut hasher = Hasher::new();
    for (rel, hash) in entries {
        hasher.update(rel.as_bytes());
        hasher.update(&[0]);
        hasher.update(hash.as_bytes());
    }
    hasher.finalize().to_hex().to_string()
}

/// Fingerprint of all files bound to `stage` under `root`.
pub fn fingerprint_stage(
    fs: &dyn FileSystem,
    root: &Path,
    table: &WatchTable,
    stage: StageName,
) -> Result<String> {
    let mut entries = Vec::new();
    for pattern in table.patterns_for(stage) {
        for file in select_files(fs, root, pattern, None)? {
            let hash = compute_file_hash(fs, &file.path)?;
            entries.push((file.rel, hash));
        }
    }
    entries.sort();
    entries.dedup();

    let hash = compute_aggregate_hash(&entries);
    debug!(stage = %stage, files = entries.len(), hash = %hash, "computed stage fingerprint");
    Ok(hash)
}

/// Last fingerprint seen per stage.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    map: HashMap<StageName, String>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, stage: StageName) -> Option<&str> {
        self.map.get(&stage).map(String::as_str)
    }

    /// Store `hash` for `stage`; returns whether it differs from the previous
    /// one (a first fingerprint always counts as changed).
    pub fn update(&mut self, stage: StageName, hash: String) -> bool {
        match self.map.insert(stage, hash.clone()) {
            Some(previous) => previous != hash,
            None => true,
        }
    }
}
