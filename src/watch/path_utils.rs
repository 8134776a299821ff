// src/watch/path_utils.rs

//! Utility functions for path handling in the watcher.

use std::path::{Component, Path, PathBuf};

/// Make `path` absolute against `base` and normalise it lexically.
///
/// `.` components are dropped and `..` pops the previous component. Symlinks
/// are not resolved, so this never touches the filesystem.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    };

    let mut out = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Render a relative path with forward slashes, for glob and regex matching.
pub fn slash_str(rel: &Path) -> String {
    rel.to_string_lossy().replace('\\', "/")
}

/// Express `path` relative to `root`, or `None` when `path` is not inside it.
///
/// - First we try a direct `strip_prefix(root)`.
/// - If that fails (e.g. due to symlinks or different absolute prefixes),
///   we canonicalize the path and try again.
///
/// The result never contains `..` components.
pub fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
    if let Some(rel) = strip_inside(root, path) {
        return Some(rel);
    }

    // macOS reports some paths under /private/var while the root was given
    // as /var; canonicalising the event path lines them up again.
    if let Ok(path_canon) = path.canonicalize() {
        if let Some(rel) = strip_inside(root, &path_canon) {
            return Some(rel);
        }
    }

    None
}

fn strip_inside(root: &Path, path: &Path) -> Option<PathBuf> {
    let rel = path.strip_prefix(root).ok()?;
    if rel
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        return None;
    }
    Some(rel.to_path_buf())
}
