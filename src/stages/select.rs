// src/stages/select.rs

//! Glob-based source selection.
//!
//! Patterns are relative to the source root and compiled with
//! `literal_separator`, so `*` never crosses a `/`. Matches come back in
//! walk order: entries of each directory sorted by name, depth first.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobBuilder, GlobMatcher};

use crate::fs::FileSystem;

/// One selected source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    /// Path relative to the source root, `/`-separated.
    pub rel: String,
    /// Path relative to the pattern's glob base (what gets written under the
    /// destination directory).
    pub rel_to_base: String,
}

/// Compile a pattern with `/`-aware wildcards.
pub fn compile_glob(pattern: &str) -> Result<Glob> {
    GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .with_context(|| format!("invalid glob pattern: {pattern}"))
}

fn has_glob_meta(segment: &str) -> bool {
    segment.contains(['*', '?', '[', '{'])
}

/// Leading literal directory of a pattern.
///
/// `icons/**/*.*` -> `icons`, `*.html` -> ``, `js/libs/modernizr.js` ->
/// `js/libs` (a literal file's base is its directory).
pub fn glob_base(pattern: &str) -> String {
    let segments: Vec<&str> = pattern.split('/').collect();
    let literal = segments.iter().take_while(|s| !has_glob_meta(s)).count();
    let take = if literal == segments.len() {
        literal.saturating_sub(1)
    } else {
        literal
    };
    segments[..take].join("/")
}

/// Select files under `root` matching `pattern`, skipping any file whose
/// relative path matches `exclude`.
pub fn select_files(
    fs: &dyn FileSystem,
    root: &Path,
    pattern: &str,
    exclude: Option<&GlobMatcher>,
) -> Result<Vec<SelectedFile>> {
    let matcher = compile_glob(pattern)?.compile_matcher();
    let base = glob_base(pattern);

    let start = if base.is_empty() {
        root.to_path_buf()
    } else {
        root.join(&base)
    };
    if !fs.is_dir(&start) {
        return Ok(Vec::new());
    }

    let mut selected = Vec::new();
    walk(fs, root, &start, &mut |path, rel| {
        if !matcher.is_match(rel) {
            return;
        }
        if exclude.is_some_and(|ex| ex.is_match(rel)) {
            return;
        }
        let rel_to_base = if base.is_empty() {
            rel.to_string()
        } else {
            rel.strip_prefix(&base)
                .map(|r| r.trim_start_matches('/').to_string())
                .unwrap_or_else(|| rel.to_string())
        };
        selected.push(SelectedFile {
            path: path.to_path_buf(),
            rel: rel.to_string(),
            rel_to_base,
        });
    })?;

    Ok(selected)
}

fn walk(
    fs: &dyn FileSystem,
    root: &Path,
    dir: &Path,
    visit: &mut dyn FnMut(&Path, &str),
) -> Result<()> {
    for path in fs.read_dir(dir)? {
        if fs.is_dir(&path) {
            walk(fs, root, &path, visit)?;
        } else if fs.is_file(&path) {
            if let Ok(rel) = path.strip_prefix(root) {
                let rel_str = rel.to_string_lossy().replace('\\', "/");
                visit(&path, &rel_str);
            }
        }
    }
    Ok(())
}

/// Join a destination directory (relative to the output root) and a file
/// path relative to it.
pub fn dest_rel(dest_dir: &str, rel: &str) -> String {
    let dest_dir = dest_dir.trim_matches('/');
    if dest_dir.is_empty() {
        rel.to_string()
    } else {
        format!("{dest_dir}/{rel}")
    }
}
