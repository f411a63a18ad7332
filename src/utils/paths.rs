//! Path normalization

use std::path::Path;

pub fn normalize_path(path: &str) -> String {
    // Convert backslashes to forward slashes and normalize
    path.replace('\\', "/")
}

/// Root-relative path with forward slashes; empty for the root itself.
pub fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .map(|rel| normalize_path(&rel.to_string_lossy()))
        .unwrap_or_default()
}
