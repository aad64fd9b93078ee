// src/reload.rs

//! Live-reload signalling.
//!
//! Stages call [`ReloadHub::signal`] after writing output; the dev server
//! forwards each signal to connected browsers. Without subscribers (release
//! builds, no open page) a signal is simply dropped.

use tokio::sync::broadcast;
use tracing::debug;

/// Output paths (relative to the output root, `/`-separated) that changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReloadSignal {
    pub paths: Vec<String>,
}

impl ReloadSignal {
    /// Stylesheets can be swapped in place; anything else needs a full reload.
    pub fn is_css_only(&self) -> bool {
        !self.paths.is_empty() && self.paths.iter().all(|p| p.ends_with(".css"))
    }

    /// Event payload understood by the injected client script.
    pub fn payload(&self) -> &'static str {
        if self.is_css_only() { "css" } else { "full" }
    }
}

#[derive(Debug, Clone)]
pub struct ReloadHub {
    tx: Option<broadcast::Sender<ReloadSignal>>,
}

impl ReloadHub {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity.max(1));
        Self { tx: Some(tx) }
    }

    /// A hub that drops every signal (release builds).
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub fn signal<I, S>(&self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let Some(tx) = &self.tx else {
            return;
        };
        let signal = ReloadSignal {
            paths: paths.into_iter().map(Into::into).collect(),
        };
        if signal.paths.is_empty() {
            return;
        }
        debug!(paths = ?signal.paths, "reload signal");
        // Err only means nobody is listening.
        let _ = tx.send(signal);
    }

    /// Subscribe to future signals. `None` when the hub is disabled.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<ReloadSignal>> {
        self.tx.as_ref().map(|tx| tx.subscribe())
    }
}
