// src/stages/copy.rs

//! Verbatim copies of everything that needs no transformation.

use tracing::info;

use crate::errors::StageError;

use super::select::{compile_glob, dest_rel, glob_base, select_files};
use super::{BuildMode, StageContext, StageReport, StageResult};

const PLUGIN: &str = "copy";

/// One copy group: files matching `pattern` land in `dest_dir`, keeping their
/// path relative to the pattern's glob base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyGroup {
    pub pattern: String,
    pub dest_dir: String,
    /// Skip files that `minify-html` already wrote.
    pub skip_minified_html: bool,
}

impl CopyGroup {
    fn new(pattern: impl Into<String>, dest_dir: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            dest_dir: dest_dir.into(),
            skip_minified_html: false,
        }
    }
}

/// The copy groups, in the order they run.
///
/// With `skip_minified_html`, the HTML group leaves out top-level pages.
pub fn copy_groups(vendor_script: &str, skip_minified_html: bool) -> Vec<CopyGroup> {
    let vendor_script = vendor_script.trim_start_matches("./");
    let mut html = CopyGroup::new("**/*.html", "");
    html.skip_minified_html = skip_minified_html;

    vec![
        CopyGroup::new(vendor_script, glob_base(vendor_script)),
        CopyGroup::new("icons/**/*.*", ""),
        html,
        CopyGroup::new("*.xml", ""),
        CopyGroup::new("*.txt", ""),
    ]
}

pub fn run(ctx: &StageContext) -> StageResult {
    let mut report = StageReport::default();
    let skip_html = compile_glob(super::html::SOURCE_PATTERN)
        .map_err(|e| StageError::from_anyhow(PLUGIN, e))?
        .compile_matcher();

    let skip_minified = ctx.skip_minified_html && ctx.mode == BuildMode::Release;
    for group in copy_groups(&ctx.vendor_script, skip_minified) {
        let exclude = group.skip_minified_html.then_some(&skip_html);
        let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), &group.pattern, exclude)
            .map_err(|e| StageError::from_anyhow(PLUGIN, e))?;

        let mut group_report = StageReport::default();
        for file in &files {
            let bytes = ctx
                .fs
                .read(&file.path)
                .map_err(|e| StageError::from_anyhow(PLUGIN, e).in_file(file.rel.clone()))?;
            let rel = dest_rel(&group.dest_dir, &file.rel_to_base);
            ctx.write_output(&mut group_report, PLUGIN, &rel, &bytes)?;
        }

        info!(pattern = %group.pattern, files = group_report.files_written(), "copied group");
        ctx.reload.signal(group_report.written_rel.iter().cloned());

        report.written.extend(group_report.written);
        report.written_rel.extend(group_report.written_rel);
        report.bytes_written += group_report.bytes_written;
    }

    Ok(report)
}
