// src/engine/sequencer.rs

//! Pure pipeline state machine.
//!
//! The sequencer owns:
//! - the cursor into the active pipeline and its running summary
//! - the stage currently in flight (at most one one-shot stage at a time)
//! - the queue of watch triggers that arrived while busy
//!
//! It has no channels, no Tokio types and performs no IO, so every ordering
//! rule can be tested by feeding it events by hand.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::graph::{PipelineName, TaskGraph};
use crate::stages::{FailurePolicy, StageKind, StageName};
use crate::types::{OnError, QueueMode};

use super::queue::TriggerQueue;
use super::{PipelineSummary, RuntimeEvent, StageOutcome, TriggerReason};

/// Command produced by the core, carried out by the async shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Run a one-shot stage; its completion comes back as `StageCompleted`.
    RunStage {
        stage: StageName,
        reason: TriggerReason,
    },
    /// Start a long-running stage and never wait for it.
    StartLongRunning { stage: StageName },
    /// The pipeline reached done (or aborted). Emitted exactly once per run.
    PipelineFinished(PipelineSummary),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

#[derive(Debug)]
struct ActivePipeline {
    name: PipelineName,
    cursor: usize,
    summary: PipelineSummary,
}

#[derive(Debug)]
pub struct Sequencer {
    graph: Arc<TaskGraph>,
    on_error: OnError,
    queue: TriggerQueue,
    active: Option<ActivePipeline>,
    running: Option<StageName>,
    last_summary: Option<PipelineSummary>,
    exit_requested: bool,
}

impl Sequencer {
    pub fn new(graph: Arc<TaskGraph>, on_error: OnError, queue_mode: QueueMode) -> Self {
        Self {
            graph,
            on_error,
            queue: TriggerQueue::new(queue_mode),
            active: None,
            running: None,
            last_summary: None,
            exit_requested: false,
        }
    }

    /// No pipeline active and no stage in flight.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.running.is_none()
    }

    pub fn running(&self) -> Option<StageName> {
        self.running
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn last_summary(&self) -> Option<&PipelineSummary> {
        self.last_summary.as_ref()
    }

    /// Handle a single runtime event.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        let mut commands = Vec::new();

        match event {
            RuntimeEvent::PipelineRequested { pipeline } => {
                self.start_pipeline(pipeline, &mut commands);
            }
            RuntimeEvent::StageTriggered { stage, reason } => {
                self.handle_trigger(stage, reason, &mut commands);
            }
            RuntimeEvent::StageCompleted { stage, outcome } => {
                self.handle_completion(stage, outcome, &mut commands);
            }
            RuntimeEvent::ShutdownRequested => {
                info!("shutdown requested");
                self.exit_requested = true;
            }
        }

        CoreStep {
            commands,
            keep_running: !self.exit_requested,
        }
    }

    fn start_pipeline(&mut self, pipeline: PipelineName, commands: &mut Vec<CoreCommand>) {
        if !self.is_idle() {
            warn!(pipeline = %pipeline, "pipeline requested while busy; ignoring");
            return;
        }
        info!(pipeline = %pipeline, stages = ?self.graph.pipeline(pipeline), "starting pipeline");
        self.active = Some(ActivePipeline {
            name: pipeline,
            cursor: 0,
            summary: PipelineSummary::new(pipeline),
        });
        self.advance(commands);
    }

    fn handle_trigger(
        &mut self,
        stage: StageName,
        reason: TriggerReason,
        commands: &mut Vec<CoreCommand>,
    ) {
        if !self.graph.is_registered(stage) {
            warn!(stage = %stage, "trigger for unregistered stage; ignoring");
            return;
        }
        if stage.kind() != StageKind::OneShot {
            warn!(stage = %stage, "trigger for long-running stage; ignoring");
            return;
        }
        if !self.is_idle() {
            self.queue.record_trigger(stage, reason);
            return;
        }
        self.run(stage, reason, commands);
    }

    fn handle_completion(
        &mut self,
        stage: StageName,
        outcome: StageOutcome,
        commands: &mut Vec<CoreCommand>,
    ) {
        if self.running != Some(stage) {
            warn!(stage = %stage, running = ?self.running, "completion for a stage that is not running; ignoring");
            return;
        }
        self.running = None;

        let abort = !outcome.is_success() && self.aborts_on_failure(stage);

        match self.active.as_mut() {
            Some(active) => {
                match outcome {
                    StageOutcome::Succeeded(report) => {
                        debug!(stage = %stage, files = report.files_written(), "stage done");
                        active.summary.completed.push(stage);
                    }
                    StageOutcome::Failed(record) => {
                        active.summary.failed.push((stage, record));
                    }
                }
                if abort {
                    warn!(stage = %stage, pipeline = %active.name, "stage failure aborts the pipeline");
                    active.summary.aborted = true;
                    self.finish(commands);
                } else {
                    self.advance(commands);
                }
            }
            None => {
                if let StageOutcome::Failed(record) = &outcome {
                    debug!(stage = %stage, plugin = %record.plugin, "watch-triggered stage failed");
                }
                self.run_next_queued(commands);
            }
        }
    }

    fn aborts_on_failure(&self, stage: StageName) -> bool {
        self.on_error == OnError::Abort || stage.failure_policy() == FailurePolicy::Abort
    }

    /// Walk the active pipeline from its cursor: start long-running stages
    /// in passing, stop at the next one-shot stage, finish at the end.
    fn advance(&mut self, commands: &mut Vec<CoreCommand>) {
        loop {
            let Some(active) = self.active.as_mut() else {
                return;
            };
            let stages = self.graph.pipeline(active.name);
            let Some(&stage) = stages.get(active.cursor) else {
                self.finish(commands);
                return;
            };
            active.cursor += 1;

            match stage.kind() {
                StageKind::LongRunning => {
                    commands.push(CoreCommand::StartLongRunning { stage });
                    active.summary.completed.push(stage);
                }
                StageKind::OneShot => {
                    self.run(stage, TriggerReason::Pipeline, commands);
                    return;
                }
            }
        }
    }

    fn run(&mut self, stage: StageName, reason: TriggerReason, commands: &mut Vec<CoreCommand>) {
        debug!(stage = %stage, ?reason, "dispatching stage");
        self.running = Some(stage);
        commands.push(CoreCommand::RunStage { stage, reason });
    }

    fn finish(&mut self, commands: &mut Vec<CoreCommand>) {
        let Some(active) = self.active.take() else {
            return;
        };
        let mut summary = active.summary;
        summary.reached_done = true;
        info!(
            pipeline = %summary.pipeline,
            completed = summary.completed.len(),
            failed = summary.failed.len(),
            aborted = summary.aborted,
            "pipeline done"
        );

        let aborted = summary.aborted;
        commands.push(CoreCommand::PipelineFinished(summary.clone()));
        self.last_summary = Some(summary);

        if aborted || active.name.exits_when_done() {
            self.exit_requested = true;
        } else {
            self.run_next_queued(commands);
        }
    }

    fn run_next_queued(&mut self, commands: &mut Vec<CoreCommand>) {
        if !self.is_idle() {
            return;
        }
        if let Some((stage, reason)) = self.queue.pop_next() {
            self.run(stage, reason, commands);
        }
    }
}
