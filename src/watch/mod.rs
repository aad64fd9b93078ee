// src/watch/mod.rs

//! File watching and change detection.
//!
//! - `bindings`: the static pattern -> stage table.
//! - `watcher`: `notify` watcher with debounced batches.
//! - `hash`: content fingerprints that suppress no-op triggers.
//!
//! It only turns filesystem changes into stage triggers; what happens with
//! those is up to the sequencer.

pub mod bindings;
pub mod event_handler;
pub mod hash;
pub mod path_utils;
pub mod watcher;

pub use bindings::{WatchBinding, WatchTable, STANDARD_BINDINGS};
pub use event_handler::stages_for_changes;
pub use hash::{compute_file_hash, fingerprint_stage, FingerprintStore};
pub use watcher::{spawn_watcher, WatchOptions, WatcherHandle};
