// src/exec/backend.rs

//! Pluggable stage executor.
//!
//! The runtime talks to a [`StageExecutor`] instead of running stages
//! itself, so tests can swap in a fake that records dispatches and answers
//! with canned outcomes.
//!
//! [`LocalStageExecutor`] is the production implementation: one-shot stages
//! run on Tokio's blocking pool and report back through the runtime channel;
//! `serve` and `watch` are spawned and kept alive for the life of the
//! executor.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::engine::{RuntimeEvent, StageOutcome, TriggerReason};
use crate::errors::{AssetpipeError, Result};
use crate::graph::TaskGraph;
use crate::notifier::{ErrorNotifier, ErrorRecord};
use crate::server::{self, ServerState};
use crate::stages::{self, StageContext, StageKind, StageName};
use crate::watch::{spawn_watcher, WatchOptions, WatcherHandle};

/// How the runtime gets stages executed.
pub trait StageExecutor: Send {
    /// Start a one-shot stage. Its outcome must come back to the runtime as
    /// `RuntimeEvent::StageCompleted`.
    fn run_stage(
        &mut self,
        stage: StageName,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;

    /// Start a long-running stage; nothing is reported back.
    fn start_long_running(
        &mut self,
        stage: StageName,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Settings for the long-running stages.
#[derive(Debug, Clone)]
pub struct LongRunningOptions {
    pub host: String,
    pub port: u16,
    pub watch: WatchOptions,
}

impl Default for LongRunningOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            watch: WatchOptions::default(),
        }
    }
}

pub struct LocalStageExecutor {
    ctx: Arc<StageContext>,
    notifier: Arc<ErrorNotifier>,
    graph: Arc<TaskGraph>,
    options: LongRunningOptions,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    server: Option<JoinHandle<()>>,
    watcher: Option<WatcherHandle>,
}

impl LocalStageExecutor {
    pub fn new(
        ctx: Arc<StageContext>,
        notifier: Arc<ErrorNotifier>,
        graph: Arc<TaskGraph>,
        options: LongRunningOptions,
        runtime_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        Self {
            ctx,
            notifier,
            graph,
            options,
            runtime_tx,
            server: None,
            watcher: None,
        }
    }

    fn start_server(&mut self) {
        if self.server.is_some() {
            warn!("dev server already running");
            return;
        }
        let state = ServerState::new(self.ctx.paths.output_root(), self.ctx.reload.clone());
        let host = self.options.host.clone();
        let port = self.options.port;
        let notifier = Arc::clone(&self.notifier);

        self.server = Some(tokio::spawn(async move {
            if let Err(err) = server::serve(&host, port, state).await {
                notifier.report(&ErrorRecord::new(StageName::Serve.as_str(), err.to_string()));
            }
        }));
    }

    fn start_watcher(&mut self) {
        if self.watcher.is_some() {
            warn!("watcher already running");
            return;
        }
        let started = spawn_watcher(
            self.ctx.paths.source_root(),
            self.graph.watch_table().clone(),
            Arc::clone(&self.ctx.fs),
            self.runtime_tx.clone(),
            self.options.watch,
        );
        match started {
            Ok(handle) => self.watcher = Some(handle),
            Err(err) => {
                self.notifier
                    .report(&ErrorRecord::new(StageName::Watch.as_str(), format!("{err:#}")));
            }
        }
    }
}

impl Drop for LocalStageExecutor {
    fn drop(&mut self) {
        if let Some(server) = self.server.take() {
            server.abort();
        }
    }
}

impl StageExecutor for LocalStageExecutor {
    fn run_stage(
        &mut self,
        stage: StageName,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let ctx = Arc::clone(&self.ctx);
        let notifier = Arc::clone(&self.notifier);
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            info!(stage = %stage, ?reason, "stage started");
            tokio::spawn(async move {
                let started = Instant::now();
                let joined =
                    tokio::task::spawn_blocking(move || stages::run_one_shot(stage, &ctx)).await;

                let outcome = match joined {
                    Ok(Ok(report)) => {
                        info!(
                            stage = %stage,
                            files = report.files_written(),
                            bytes = report.bytes_written,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "stage finished"
                        );
                        StageOutcome::Succeeded(report)
                    }
                    Ok(Err(err)) => {
                        let record = ErrorRecord::from(err);
                        notifier.report(&record);
                        StageOutcome::Failed(record)
                    }
                    Err(join_err) => {
                        let record = ErrorRecord::new(stage.as_str(), format!("stage panicked: {join_err}"));
                        notifier.report(&record);
                        StageOutcome::Failed(record)
                    }
                };

                if tx.send(RuntimeEvent::StageCompleted { stage, outcome }).await.is_err() {
                    warn!(stage = %stage, "runtime gone before stage completion was delivered");
                }
            });
            Ok(())
        })
    }

    fn start_long_running(
        &mut self,
        stage: StageName,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            if stage.kind() != StageKind::LongRunning {
                return Err(AssetpipeError::InvalidGraph(format!(
                    "stage '{stage}' is not long-running"
                )));
            }
            match stage {
                StageName::Serve => self.start_server(),
                StageName::Watch => self.start_watcher(),
                _ => {}
            }
            info!(stage = %stage, "long-running stage started");
            Ok(())
        })
    }
}
