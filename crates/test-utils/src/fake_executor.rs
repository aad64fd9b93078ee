use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use assetpipe::engine::{RuntimeEvent, StageOutcome, TriggerReason};
use assetpipe::errors::Result;
use assetpipe::exec::StageExecutor;
use assetpipe::notifier::ErrorRecord;
use assetpipe::stages::{StageName, StageReport};

/// One call the runtime made into the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Run(StageName, TriggerReason),
    Start(StageName),
}

/// A fake executor that:
/// - records every dispatch in order
/// - immediately reports `StageCompleted` for each one-shot stage, failing
///   the stages it was told to fail.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    dispatched: Arc<Mutex<Vec<Dispatch>>>,
    failures: HashMap<StageName, ErrorRecord>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        dispatched: Arc<Mutex<Vec<Dispatch>>>,
    ) -> Self {
        Self {
            runtime_tx,
            dispatched,
            failures: HashMap::new(),
        }
    }

    /// Make every run of `stage` fail with `record`.
    pub fn failing(mut self, stage: StageName, record: ErrorRecord) -> Self {
        self.failures.insert(stage, record);
        self
    }
}

impl StageExecutor for FakeExecutor {
    fn run_stage(
        &mut self,
        stage: StageName,
        reason: TriggerReason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let dispatched = Arc::clone(&self.dispatched);
        let outcome = match self.failures.get(&stage) {
            Some(record) => StageOutcome::Failed(record.clone()),
            None => StageOutcome::Succeeded(StageReport::default()),
        };

        Box::pin(async move {
            dispatched.lock().unwrap().push(Dispatch::Run(stage, reason));
            tx.send(RuntimeEvent::StageCompleted { stage, outcome })
                .await
                .map_err(anyhow::Error::from)?;
            Ok(())
        })
    }

    fn start_long_running(
        &mut self,
        stage: StageName,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let dispatched = Arc::clone(&self.dispatched);
        Box::pin(async move {
            dispatched.lock().unwrap().push(Dispatch::Start(stage));
            Ok(())
        })
    }
}

/// Stage names of all `Run` dispatches, in order.
pub fn run_names(dispatched: &[Dispatch]) -> Vec<StageName> {
    dispatched
        .iter()
        .filter_map(|d| match d {
            Dispatch::Run(stage, _) => Some(*stage),
            Dispatch::Start(_) => None,
        })
        .collect()
}
