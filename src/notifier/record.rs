// src/notifier/record.rs

use std::fmt;

/// Structured description of a stage failure.
///
/// Lives only long enough to be reported and recorded in the pipeline
/// summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// Name of the tool or plugin that raised the error (e.g. `lightningcss`).
    pub plugin: String,
    pub message: String,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
}

impl ErrorRecord {
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
            file_name: None,
            line_number: None,
        }
    }

    /// `"[plugin] message in file on line N"` as a single line.
    ///
    /// The ` in file` and ` on line N` parts appear only when known.
    pub fn display_line(&self) -> String {
        let mut line = format!("[{}] {}", self.plugin, single_line(&self.message));
        if let Some(file) = &self.file_name {
            line.push_str(" in ");
            line.push_str(file);
        }
        if let Some(n) = self.line_number {
            line.push_str(&format!(" on line {n}"));
        }
        line
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_line())
    }
}

/// Strip trailing line breaks, then collapse every remaining run of line
/// breaks (and the whitespace around them) into one space.
pub fn single_line(message: &str) -> String {
    let trimmed = message.trim_end_matches(['\n', '\r']);
    let mut out = String::with_capacity(trimmed.len());
    for (i, part) in trimmed.split(['\n', '\r']).enumerate() {
        let part = if i == 0 { part.trim_end() } else { part.trim() };
        if part.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(part);
    }
    out
}
