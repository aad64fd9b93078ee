// src/stages/html.rs

use minify_html::{minify, Cfg};
use tracing::info;

use crate::errors::StageError;

use super::select::select_files;
use super::{StageContext, StageReport, StageResult};

pub const SOURCE_PATTERN: &str = "*.html";

const PLUGIN: &str = "minify-html";

/// Minifier settings: comments, closing tags and redundant attributes stay.
pub fn html_cfg() -> Cfg {
    Cfg {
        keep_comments: true,
        keep_closing_tags: true,
        keep_html_and_head_opening_tags: true,
        keep_input_type_text_attr: true,
        ..Cfg::default()
    }
}

/// Minify top-level HTML pages into the output root.
pub fn run(ctx: &StageContext) -> StageResult {
    let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), SOURCE_PATTERN, None)
        .map_err(|e| StageError::from_anyhow(PLUGIN, e))?;

    let cfg = html_cfg();
    let mut report = StageReport::default();
    for file in &files {
        let source = ctx
            .fs
            .read(&file.path)
            .map_err(|e| StageError::from_anyhow(PLUGIN, e).in_file(file.rel.clone()))?;
        let minified = minify(&source, &cfg);
        info!(file = %file.rel, original = source.len(), minified = minified.len(), "minified page");
        ctx.write_output(&mut report, PLUGIN, &file.rel_to_base, &minified)?;
    }

    ctx.reload.signal(report.written_rel.clone());
    Ok(report)
}
