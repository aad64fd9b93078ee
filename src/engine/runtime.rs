// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::StageExecutor;
use crate::graph::PipelineName;

use super::sequencer::Sequencer;
use super::{CoreCommand, CoreStep, PipelineSummary, RuntimeEvent};

/// Async shell around the [`Sequencer`].
///
/// Reads `RuntimeEvent`s from its channel, feeds them to the core and hands
/// the resulting commands to a [`StageExecutor`].
pub struct Runtime<E: StageExecutor> {
    core: Sequencer,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
}

impl<E: StageExecutor> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: StageExecutor> Runtime<E> {
    pub fn new(core: Sequencer, event_rx: mpsc::Receiver<RuntimeEvent>, executor: E) -> Self {
        Self {
            core,
            event_rx,
            executor,
        }
    }

    /// Run `pipeline` and keep servicing events until the core says stop.
    ///
    /// `on_complete` is called exactly once, when the pipeline reaches done
    /// or aborts. Returns the summary, or `None` if the runtime stopped
    /// (Ctrl-C, closed channel) before the pipeline finished.
    pub async fn run_pipeline<F>(
        mut self,
        pipeline: PipelineName,
        on_complete: F,
    ) -> Result<Option<PipelineSummary>>
    where
        F: FnOnce(&PipelineSummary) + Send,
    {
        info!(pipeline = %pipeline, "assetpipe runtime started");

        let mut on_complete = Some(on_complete);
        let mut summary = None;

        let first = self.core.step(RuntimeEvent::PipelineRequested { pipeline });
        let mut keep_running = self.execute_step(first, &mut on_complete, &mut summary).await?;

        while keep_running {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };
            debug!(?event, "runtime received event");

            let step = self.core.step(event);
            keep_running = self.execute_step(step, &mut on_complete, &mut summary).await?;
        }

        info!("runtime exiting");
        Ok(summary)
    }

    async fn execute_step<F>(
        &mut self,
        step: CoreStep,
        on_complete: &mut Option<F>,
        summary: &mut Option<PipelineSummary>,
    ) -> Result<bool>
    where
        F: FnOnce(&PipelineSummary) + Send,
    {
        for command in step.commands {
            match command {
                CoreCommand::RunStage { stage, reason } => {
                    self.executor.run_stage(stage, reason).await?;
                }
                CoreCommand::StartLongRunning { stage } => {
                    self.executor.start_long_running(stage).await?;
                }
                CoreCommand::PipelineFinished(finished) => {
                    if let Some(callback) = on_complete.take() {
                        callback(&finished);
                    }
                    *summary = Some(finished);
                }
            }
        }

        if !step.keep_running {
            info!("core requested exit; stopping runtime");
        }
        Ok(step.keep_running)
    }
}
