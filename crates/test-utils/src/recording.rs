use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use assetpipe::notifier::{ErrorRecord, Notifier};

/// Notifier channel that keeps every record and its rendered line.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    records: Arc<Mutex<Vec<ErrorRecord>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<ErrorRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.records().iter().map(|r| r.display_line()).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn notify(&self, record: &ErrorRecord) -> Result<()> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

/// Channel that always fails to deliver.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingNotifier;

impl Notifier for FailingNotifier {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn notify(&self, _record: &ErrorRecord) -> Result<()> {
        Err(anyhow!("notification daemon unavailable"))
    }
}
