// src/engine/mod.rs

//! Pipeline orchestration.
//!
//! The pure state machine lives in [`sequencer`]: it consumes
//! [`RuntimeEvent`]s and answers with [`CoreCommand`]s, without touching
//! channels, tasks or the filesystem. The async shell in [`runtime`] feeds it
//! events and carries out its commands through a `StageExecutor`.

use crate::graph::PipelineName;
use crate::notifier::ErrorRecord;
use crate::stages::{StageName, StageReport};

pub mod queue;
pub mod runtime;
pub mod sequencer;

pub use queue::TriggerQueue;
pub use runtime::Runtime;
pub use sequencer::{CoreCommand, CoreStep, Sequencer};

/// Why a stage was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Next step of a pipeline.
    Pipeline,
    /// A bound source file changed.
    FileWatch,
    /// Requested directly (tests, tooling).
    Manual,
}

/// Result of one one-shot stage run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Succeeded(StageReport),
    Failed(ErrorRecord),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Succeeded(_))
    }
}

/// Events flowing into the runtime from the CLI, the watcher and the executor.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Start a pipeline from its first stage.
    PipelineRequested { pipeline: PipelineName },
    /// Run a single stage outside of a pipeline (watch triggers).
    StageTriggered {
        stage: StageName,
        reason: TriggerReason,
    },
    /// A one-shot stage finished.
    StageCompleted {
        stage: StageName,
        outcome: StageOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// What a pipeline run amounted to. Handed to the completion callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSummary {
    pub pipeline: PipelineName,
    /// Stages that ran (or were started) successfully, in order.
    pub completed: Vec<StageName>,
    /// Stages that failed, with the reported record.
    pub failed: Vec<(StageName, ErrorRecord)>,
    /// A failure with an abort policy ended the pipeline early.
    pub aborted: bool,
    /// The terminal "done" step was reached (always true once reported).
    pub reached_done: bool,
}

impl PipelineSummary {
    pub fn new(pipeline: PipelineName) -> Self {
        Self {
            pipeline,
            completed: Vec::new(),
            failed: Vec::new(),
            aborted: false,
            reached_done: false,
        }
    }

    pub fn is_success(&self) -> bool {
        !self.aborted && self.failed.is_empty()
    }
}
