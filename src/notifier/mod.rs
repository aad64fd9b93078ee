// src/notifier/mod.rs

//! Error reporting.
//!
//! Every stage failure ends up here as an [`ErrorRecord`]. The
//! [`ErrorNotifier`] fans it out to the configured [`Notifier`] channels;
//! the console channel is the single log line the user sees. Delivery is best effort: a channel that
//! fails is logged at debug level and otherwise ignored.

use std::fmt;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, error};

mod record;

#[cfg(feature = "desktop-notify")]
mod desktop;

pub use record::{single_line, ErrorRecord};

#[cfg(feature = "desktop-notify")]
pub use desktop::DesktopNotifier;

/// A destination for error reports.
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;
    fn notify(&self, record: &ErrorRecord) -> Result<()>;
}

/// Logs the failure as one `error` line; the log subscriber writes it to
/// stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn name(&self) -> &'static str {
        "console"
    }

    fn notify(&self, record: &ErrorRecord) -> Result<()> {
        error!(plugin = %record.plugin, "Failure! {}", record.display_line());
        Ok(())
    }
}

/// Fans one error report out to every channel.
#[derive(Clone)]
pub struct ErrorNotifier {
    channels: Vec<Arc<dyn Notifier>>,
}

impl fmt::Debug for ErrorNotifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.channels.iter().map(|c| c.name()).collect();
        f.debug_struct("ErrorNotifier")
            .field("channels", &names)
            .finish()
    }
}

impl Default for ErrorNotifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorNotifier {
    /// Notifier with the console channel only.
    pub fn new() -> Self {
        Self {
            channels: vec![Arc::new(ConsoleNotifier)],
        }
    }

    /// Notifier without any channels; reports only show up at debug level.
    pub fn silent() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Console channel plus the desktop channel when requested and compiled in.
    pub fn from_config(desktop: bool) -> Self {
        let notifier = Self::new();
        if desktop {
            with_desktop(notifier)
        } else {
            notifier
        }
    }

    pub fn with_channel(mut self, channel: Arc<dyn Notifier>) -> Self {
        self.channels.push(channel);
        self
    }

    pub fn channel_names(&self) -> Vec<&'static str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Forward `record` to every channel.
    pub fn report(&self, record: &ErrorRecord) {
        debug!(plugin = %record.plugin, channels = self.channels.len(), "dispatching error report");

        for channel in &self.channels {
            if let Err(err) = channel.notify(record) {
                debug!(channel = channel.name(), error = %err, "notification delivery failed");
            }
        }
    }
}

#[cfg(feature = "desktop-notify")]
fn with_desktop(notifier: ErrorNotifier) -> ErrorNotifier {
    notifier.with_channel(Arc::new(DesktopNotifier::default()))
}

#[cfg(not(feature = "desktop-notify"))]
fn with_desktop(notifier: ErrorNotifier) -> ErrorNotifier {
    tracing::warn!("[notify] desktop = true, but assetpipe was built without the `desktop-notify` feature");
    notifier
}
