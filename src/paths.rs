// src/paths.rs

//! Source/output root resolution.
//!
//! Every stage derives its inputs and outputs from one [`BasePaths`] value.
//! Derived paths are plain lexical joins, so they always stay nested under
//! the root they were derived from.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePaths {
    source: PathBuf,
    output: PathBuf,
}

impl BasePaths {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }

    pub fn source_root(&self) -> &Path {
        &self.source
    }

    pub fn output_root(&self) -> &Path {
        &self.output
    }

    /// Glob text for `rel` under the source root, always with `/` separators.
    pub fn source_pattern(&self, rel: &str) -> String {
        let root = to_slash(&self.source);
        let rel = rel.trim_start_matches('/');
        if root.is_empty() || root == "." {
            rel.to_string()
        } else {
            format!("{}/{}", root.trim_end_matches('/'), rel)
        }
    }

    pub fn source_path(&self, rel: &str) -> PathBuf {
        join_relative(&self.source, rel)
    }

    pub fn output_path(&self, rel: &str) -> PathBuf {
        join_relative(&self.output, rel)
    }
}

/// Join `rel` under `root`, dropping any root, prefix, `.` and `..`
/// components so the result cannot escape `root`.
fn join_relative(root: &Path, rel: &str) -> PathBuf {
    let mut out = root.to_path_buf();
    for component in Path::new(rel).components() {
        if let Component::Normal(part) = component {
            out.push(part);
        }
    }
    out
}

/// Render a path with forward slashes.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// True when `inner` equals `outer` or lies below it.
///
/// Relative paths are resolved against the current directory first, so
/// `..` compares as the real parent.
pub fn is_within(outer: &Path, inner: &Path) -> bool {
    let outer = normalize(&absolute(outer));
    let inner = normalize(&absolute(inner));
    inner.starts_with(&outer)
}

/// `path` joined onto the current directory when relative.
pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Lexical normalisation: drops `.` components and folds `..` into a
/// preceding normal component. Leading `..` components are kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().map(|c| c.as_os_str()).collect()
}
