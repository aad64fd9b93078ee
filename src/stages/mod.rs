// src/stages/mod.rs

//! Stage tasks.
//!
//! A one-shot stage is a plain synchronous function of a [`StageContext`]
//! returning a [`StageReport`] or a [`StageError`]. The executor runs it on
//! the blocking pool. Long-running stages (`serve`, `watch`) live in
//! `crate::server` and `crate::watch` and are started by the executor.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{AssetpipeError, StageError};
use crate::fs::FileSystem;
use crate::graph::PipelineName;
use crate::paths::BasePaths;
use crate::reload::ReloadHub;

pub mod clean;
pub mod copy;
pub mod html;
pub mod images;
pub mod scripts;
pub mod select;
pub mod styles;
pub mod vendor;

pub type StageResult = std::result::Result<StageReport, StageError>;

/// Every stage the graph knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageName {
    Clean,
    Styles,
    Scripts,
    VendorScripts,
    Images,
    MinifyHtml,
    Copy,
    Serve,
    Watch,
}

impl StageName {
    pub const ALL: [StageName; 9] = [
        StageName::Clean,
        StageName::Styles,
        StageName::Scripts,
        StageName::VendorScripts,
        StageName::Images,
        StageName::MinifyHtml,
        StageName::Copy,
        StageName::Serve,
        StageName::Watch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StageName::Clean => "clean",
            StageName::Styles => "styles",
            StageName::Scripts => "scripts",
            StageName::VendorScripts => "vendor-scripts",
            StageName::Images => "images",
            StageName::MinifyHtml => "minify-html",
            StageName::Copy => "copy",
            StageName::Serve => "serve",
            StageName::Watch => "watch",
        }
    }

    pub fn kind(self) -> StageKind {
        match self {
            StageName::Serve | StageName::Watch => StageKind::LongRunning,
            _ => StageKind::OneShot,
        }
    }

    /// Failure policy of the stage itself, before `[pipeline] on_error`.
    pub fn failure_policy(self) -> FailurePolicy {
        match self {
            StageName::Clean => FailurePolicy::Abort,
            _ => FailurePolicy::Continue,
        }
    }
}

impl fmt::Display for StageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StageName {
    type Err = AssetpipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StageName::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s.trim())
            .ok_or_else(|| AssetpipeError::UnknownStage(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    /// Runs to completion; the sequencer waits for it.
    OneShot,
    /// Started and left running (`serve`, `watch`).
    LongRunning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    Continue,
    Abort,
}

/// Which pipeline the stages are running for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Dev,
    Release,
}

impl From<PipelineName> for BuildMode {
    fn from(pipeline: PipelineName) -> Self {
        match pipeline {
            PipelineName::Dev => BuildMode::Dev,
            PipelineName::Release => BuildMode::Release,
        }
    }
}

/// Everything a one-shot stage needs.
#[derive(Debug, Clone)]
pub struct StageContext {
    pub paths: BasePaths,
    pub fs: Arc<dyn FileSystem>,
    pub reload: ReloadHub,
    pub mode: BuildMode,
    /// Vendor script copied by `copy`, relative to the source root.
    pub vendor_script: String,
    /// In release, leave top-level pages written by `minify-html` alone.
    pub skip_minified_html: bool,
}

impl StageContext {
    pub fn new(paths: BasePaths, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            paths,
            fs,
            reload: ReloadHub::disabled(),
            mode: BuildMode::Dev,
            vendor_script: "js/libs/modernizr.js".to_string(),
            skip_minified_html: false,
        }
    }

    pub fn with_reload(mut self, reload: ReloadHub) -> Self {
        self.reload = reload;
        self
    }

    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_vendor_script(mut self, vendor_script: impl Into<String>) -> Self {
        self.vendor_script = vendor_script.into();
        self
    }

    pub fn with_skip_minified_html(mut self, skip: bool) -> Self {
        self.skip_minified_html = skip;
        self
    }

    /// Write `contents` to `rel` under the output root and record it.
    pub(crate) fn write_output(
        &self,
        report: &mut StageReport,
        plugin: &str,
        rel: &str,
        contents: &[u8],
    ) -> Result<(), StageError> {
        let dest = self.paths.output_path(rel);
        self.fs
            .write(&dest, contents)
            .map_err(|e| StageError::from_anyhow(plugin, e))?;
        report.record(dest, rel, contents.len());
        Ok(())
    }
}

/// What a one-shot stage wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Absolute (or root-joined) paths of every written file.
    pub written: Vec<PathBuf>,
    /// Same files relative to the output root, `/`-separated.
    pub written_rel: Vec<String>,
    pub bytes_written: u64,
}

impl StageReport {
    pub fn record(&mut self, dest: PathBuf, rel: &str, bytes: usize) {
        self.written.push(dest);
        self.written_rel.push(rel.to_string());
        self.bytes_written += bytes as u64;
    }

    pub fn files_written(&self) -> usize {
        self.written.len()
    }
}

/// Run a one-shot stage by name.
///
/// Long-running stages are rejected; the executor starts those itself.
pub fn run_one_shot(stage: StageName, ctx: &StageContext) -> StageResult {
    match stage {
        StageName::Clean => clean::run(ctx),
        StageName::Styles => styles::run(ctx),
        StageName::Scripts => scripts::run(ctx),
        StageName::VendorScripts => vendor::run(ctx),
        StageName::Images => images::run(ctx),
        StageName::MinifyHtml => html::run(ctx),
        StageName::Copy => copy::run(ctx),
        StageName::Serve | StageName::Watch => Err(StageError::new(
            stage.as_str(),
            "long-running stage cannot be run to completion",
        )),
    }
}
