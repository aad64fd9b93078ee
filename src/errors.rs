// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::notifier::ErrorRecord;

#[derive(Error, Debug)]
pub enum AssetpipeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid task graph: {0}")]
    InvalidGraph(String),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AssetpipeError>;

/// Failure of a single stage invocation.
///
/// Carries enough context to point the user at the offending source file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{plugin}] {message}")]
pub struct StageError {
    pub plugin: String,
    pub message: String,
    pub file_name: Option<String>,
    pub line_number: Option<u32>,
}

impl StageError {
    pub fn new(plugin: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            plugin: plugin.into(),
            message: message.into(),
            file_name: None,
            line_number: None,
        }
    }

    /// Wrap an `anyhow` error (usually IO with context) under `plugin`.
    pub fn from_anyhow(plugin: impl Into<String>, err: anyhow::Error) -> Self {
        Self::new(plugin, format!("{err:#}"))
    }

    pub fn in_file(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn on_line(mut self, line: u32) -> Self {
        self.line_number = Some(line);
        self
    }
}

impl From<StageError> for ErrorRecord {
    fn from(err: StageError) -> Self {
        ErrorRecord {
            plugin: err.plugin,
            message: err.message,
            file_name: err.file_name,
            line_number: err.line_number,
        }
    }
}
