// src/stages/styles.rs

//! `css/**/*.css` -> `css/styles.css` -> `css/styles.min.css`.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use tracing::info;

use crate::errors::StageError;

use super::select::select_files;
use super::{StageContext, StageReport, StageResult};

pub const SOURCE_PATTERN: &str = "css/**/*.css";
pub const CONCAT_OUTPUT: &str = "css/styles.css";
pub const MINIFIED_OUTPUT: &str = "css/styles.min.css";

const PLUGIN: &str = "lightningcss";

/// Where one source file starts inside the concatenated stylesheet.
#[derive(Debug, Clone)]
struct Segment {
    rel: String,
    first_line: u32,
}

/// Concatenate, write, minify, write, reload.
pub fn run(ctx: &StageContext) -> StageResult {
    let files = select_files(ctx.fs.as_ref(), ctx.paths.source_root(), SOURCE_PATTERN, None)
        .map_err(|e| StageError::from_anyhow("styles", e))?;

    let mut report = StageReport::default();
    if files.is_empty() {
        info!("no stylesheets found; nothing to do");
        return Ok(report);
    }

    let mut parts = Vec::with_capacity(files.len());
    let mut segments = Vec::with_capacity(files.len());
    let mut next_line = 1u32;
    for file in &files {
        let text = ctx
            .fs
            .read_to_string(&file.path)
            .map_err(|e| StageError::from_anyhow("styles", e).in_file(file.rel.clone()))?;
        segments.push(Segment {
            rel: file.rel.clone(),
            first_line: next_line,
        });
        next_line += text.matches('\n').count() as u32 + 1;
        parts.push(text);
    }
    let concatenated = parts.join("\n");

    ctx.write_output(&mut report, "styles", CONCAT_OUTPUT, concatenated.as_bytes())?;

    let minified = minify_css(&concatenated, &segments)?;
    ctx.write_output(&mut report, PLUGIN, MINIFIED_OUTPUT, minified.as_bytes())?;

    info!(
        inputs = files.len(),
        concat_bytes = concatenated.len(),
        min_bytes = minified.len(),
        "styles built"
    );

    ctx.reload.signal([CONCAT_OUTPUT, MINIFIED_OUTPUT]);
    Ok(report)
}

fn minify_css(code: &str, segments: &[Segment]) -> Result<String, StageError> {
    let options = ParserOptions {
        filename: CONCAT_OUTPUT.to_string(),
        ..ParserOptions::default()
    };

    let mut sheet = StyleSheet::parse(code, options).map_err(|err| {
        let line = err.loc.as_ref().map(|loc| loc.line);
        located_error(err.kind.to_string(), line, segments)
    })?;

    sheet.minify(MinifyOptions::default()).map_err(|err| {
        let line = err.loc.as_ref().map(|loc| loc.line);
        located_error(err.kind.to_string(), line, segments)
    })?;

    let printed = sheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|err| {
            let line = err.loc.as_ref().map(|loc| loc.line);
            located_error(err.kind.to_string(), line, segments)
        })?;

    Ok(printed.code)
}

/// `line` is the 0-based line in the concatenated text.
fn located_error(message: String, line: Option<u32>, segments: &[Segment]) -> StageError {
    let mut err = StageError::new(PLUGIN, message);
    if let Some(line) = line {
        if let Some((file, local)) = map_line(line + 1, segments) {
            err = err.in_file(file).on_line(local);
        } else {
            err = err.on_line(line + 1);
        }
    }
    err
}

/// Map a 1-based line of the concatenation back to (source file, 1-based line).
fn map_line(line: u32, segments: &[Segment]) -> Option<(String, u32)> {
    segments
        .iter()
        .rev()
        .find(|seg| seg.first_line <= line)
        .map(|seg| (seg.rel.clone(), line - seg.first_line + 1))
}
