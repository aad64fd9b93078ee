// src/exec/mod.rs

//! Stage execution backends.

pub mod backend;

pub use backend::{LocalStageExecutor, LongRunningOptions, StageExecutor};
