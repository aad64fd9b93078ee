// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::Path;

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Tries a plain `strip_prefix` first, then retries with both sides
/// canonicalized (symlinked temp dirs on macOS report `/private/var/...`).
/// Returns `None` for paths outside `root` and for `root` itself.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = match path.strip_prefix(root) {
        Ok(rel) => rel.to_path_buf(),
        Err(_) => {
            let root_canon = root.canonicalize().ok()?;
            let path_canon = path.canonicalize().ok()?;
            path_canon.strip_prefix(&root_canon).ok()?.to_path_buf()
        }
    };

    let s = rel.to_string_lossy().replace('\\', "/");
    if s.is_empty() { None } else { Some(s) }
}
