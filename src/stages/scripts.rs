// src/stages/scripts.rs

//! Top-level `js/*.js`, each minified, concatenated into `js/app.js`.

use minify_js::{minify, Session, TopLevelMode};
use tracing::info;

use crate::errors::StageError;

use super::select::select_files;
use super::{StageContext, StageReport, StageResult};

pub const SOURCE_PATTERN: &str = "js/*.js";
pub const OUTPUT: &str = "js/app.js";

const PLUGIN: &str = "minify-js";

pub fn run(ctx: &StageContext) -> StageResult {
    let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), SOURCE_PATTERN, None)
        .map_err(|e| StageError::from_anyhow("scripts", e))?;

    let mut report = StageReport::default();
    if files.is_empty() {
        info!("no scripts found; nothing to do");
        return Ok(report);
    }

    let session = Session::new();
    let mut minified_parts: Vec<Vec<u8>> = Vec::with_capacity(files.len());

    for file in &files {
        let source = ctx
            .fs
            .read(&file.path)
            .map_err(|e| StageError::from_anyhow("scripts", e).in_file(file.rel.clone()))?;

        let mut out = Vec::with_capacity(source.len());
        minify(&session, TopLevelMode::Global, &source, &mut out).map_err(|err| {
            StageError::new(PLUGIN, format!("{err:?}")).in_file(file.rel.clone())
        })?;

        info!(file = %file.rel, original = source.len(), minified = out.len(), "minified script");
        minified_parts.push(out);
    }

    let bundle = minified_parts.join(&b'\n');
    ctx.write_output(&mut report, "scripts", OUTPUT, &bundle)?;
    info!(inputs = files.len(), bytes = bundle.len(), "wrote {OUTPUT}");

    ctx.reload.signal([OUTPUT]);
    Ok(report)
}
