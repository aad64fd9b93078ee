// src/engine/queue.rs

use std::collections::VecDeque;

use tracing::debug;

use crate::stages::StageName;
use crate::types::QueueMode;

use super::TriggerReason;

/// Stage triggers that arrived while something else was running.
///
/// - `Coalesce`: a stage already pending is not queued again, so a burst of
///   saves re-runs it once.
/// - `Replay`: every trigger is kept and replayed in arrival order.
#[derive(Debug)]
pub struct TriggerQueue {
    mode: QueueMode,
    pending: VecDeque<(StageName, TriggerReason)>,
}

impl TriggerQueue {
    pub fn new(mode: QueueMode) -> Self {
        Self {
            mode,
            pending: VecDeque::new(),
        }
    }

    pub fn mode(&self) -> QueueMode {
        self.mode
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn record_trigger(&mut self, stage: StageName, reason: TriggerReason) {
        if self.mode == QueueMode::Coalesce && self.pending.iter().any(|(s, _)| *s == stage) {
            debug!(stage = %stage, "trigger coalesced into pending entry");
            return;
        }
        debug!(stage = %stage, pending = self.pending.len() + 1, "trigger queued");
        self.pending.push_back((stage, reason));
    }

    pub fn pop_next(&mut self) -> Option<(StageName, TriggerReason)> {
        self.pending.pop_front()
    }
}
