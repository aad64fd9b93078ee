// src/stages/vendor.rs

use tracing::info;

use crate::errors::StageError;

use super::select::{dest_rel, select_files};
use super::{StageContext, StageReport, StageResult};

pub const SOURCE_PATTERN: &str = "js/libs/*.js";
pub const DEST_DIR: &str = "js/libs";

const PLUGIN: &str = "vendor-scripts";

/// Copy third-party scripts verbatim.
pub fn run(ctx: &StageContext) -> StageResult {
    let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), SOURCE_PATTERN, None)
        .map_err(|e| StageError::from_anyhow(PLUGIN, e))?;

    let mut report = StageReport::default();
    for file in &files {
        let bytes = ctx
            .fs
            .read(&file.path)
            .map_err(|e| StageError::from_anyhow(PLUGIN, e).in_file(file.rel.clone()))?;
        ctx.write_output(&mut report, PLUGIN, &dest_rel(DEST_DIR, &file.rel_to_base), &bytes)?;
    }

    info!(files = report.files_written(), "copied vendor scripts");
    Ok(report)
}
