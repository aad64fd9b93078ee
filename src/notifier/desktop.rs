// src/notifier/desktop.rs

use anyhow::Result;
use notify_rust::Notification;

use super::{single_line, ErrorRecord, Notifier};

/// Native desktop notification.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    title: String,
    subtitle: String,
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self {
            title: "assetpipe".to_string(),
            subtitle: "Failure!".to_string(),
        }
    }
}

impl Notifier for DesktopNotifier {
    fn name(&self) -> &'static str {
        "desktop"
    }

    fn notify(&self, record: &ErrorRecord) -> Result<()> {
        Notification::new()
            .summary(&format!("{}: {}", self.title, self.subtitle))
            .body(&format!("Error: {}", single_line(&record.message)))
            .show()?;
        Ok(())
    }
}
