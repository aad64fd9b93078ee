// src/stages/clean.rs

use tracing::info;

use crate::errors::StageError;
use crate::paths::is_within;

use super::{StageContext, StageReport, StageResult};

const PLUGIN: &str = "clean";

/// Remove the output root recursively. An absent output root is fine.
pub fn run(ctx: &StageContext) -> StageResult {
    let output = ctx.paths.output_root();
    let source = ctx.paths.source_root();

    if is_within(output, source) {
        return Err(StageError::new(
            PLUGIN,
            format!(
                "refusing to remove {} because it contains the source root {}",
                output.display(),
                source.display()
            ),
        ));
    }

    if !ctx.fs.exists(output) {
        info!(path = ?output, "output root absent; nothing to clean");
        return Ok(StageReport::default());
    }

    ctx.fs
        .remove_dir_all(output)
        .map_err(|e| StageError::from_anyhow(PLUGIN, e))?;
    info!(path = ?output, "removed output root");
    Ok(StageReport::default())
}
