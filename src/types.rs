// src/types.rs

use std::str::FromStr;

use serde::Deserialize;

/// What the sequencer does when a stage fails.
///
/// - `Continue`: report the failure and move on to the next stage (default).
///   Stages whose own policy is to abort (e.g. `clean`) still abort.
/// - `Abort`: every failure ends the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnError {
    #[default]
    Continue,
    Abort,
}

impl FromStr for OnError {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "continue" => Ok(OnError::Continue),
            "abort" => Ok(OnError::Abort),
            other => Err(format!(
                "invalid on_error: {other} (expected \"continue\" or \"abort\")"
            )),
        }
    }
}

/// Behaviour for watch triggers that arrive while a stage is running.
///
/// - `Coalesce`: keep at most one pending entry per stage.
/// - `Replay`: queue every trigger and run them all in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QueueMode {
    #[default]
    Coalesce,
    Replay,
}

impl QueueMode {
    pub fn from_coalesce(coalesce: bool) -> Self {
        if coalesce {
            QueueMode::Coalesce
        } else {
            QueueMode::Replay
        }
    }
}
