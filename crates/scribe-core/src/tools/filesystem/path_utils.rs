//! Path helpers shared by the filesystem tools.

use std::path::{Component, Path, PathBuf};

/// Resolve a tool-supplied path: absolute paths are kept, relative ones are
/// joined onto the workspace. `.` and `..` are folded lexically.
pub fn resolve_path(workspace: &Path, path: &str) -> PathBuf {
    let candidate = Path::new(path);
    if candidate.is_absolute() {
        normalize_path(candidate)
    } else {
        normalize_path(&workspace.join(candidate))
    }
}

/// Normalize a path by resolving `.` and `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::Prefix(p) => components.push(Component::Prefix(p)),
            Component::RootDir => {
                components.retain(|c| matches!(c, Component::Prefix(_)));
                components.push(Component::RootDir);
            }
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                _ => components.push(Component::ParentDir),
            },
            Component::Normal(c) => components.push(Component::Normal(c)),
        }
    }

    if components.is_empty() {
        PathBuf::from(".")
    } else {
        components.iter().collect()
    }
}

/// Display a path with forward slashes on every platform.
pub fn path_to_display(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Display `path` relative to `base` when it lies inside it.
pub fn relative_display(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
        Ok(rel) => path_to_display(rel),
        Err(_) => path_to_display(path),
    }
}

/// Create the parent directories of `path` if missing.
pub async fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize_path(Path::new("/a/./b")), PathBuf::from("/a/b"));
        assert_eq!(normalize_path(Path::new("/..")), PathBuf::from("/"));
        assert_eq!(normalize_path(Path::new("../x")), PathBuf::from("../x"));
        assert_eq!(normalize_path(Path::new(".")), PathBuf::from("."));
    }

    #[test]
    fn test_resolve_path() {
        let workspace = Path::new("/work");
        assert_eq!(resolve_path(workspace, "src/main.rs"), PathBuf::from("/work/src/main.rs"));
        assert_eq!(resolve_path(workspace, "/etc/hosts"), PathBuf::from("/etc/hosts"));
        assert_eq!(resolve_path(workspace, "."), PathBuf::from("/work"));
        assert_eq!(resolve_path(workspace, "../other"), PathBuf::from("/other"));
    }

    #[test]
    fn test_relative_display() {
        let base = Path::new("/work");
        assert_eq!(relative_display(Path::new("/work/src/a.rs"), base), "src/a.rs");
        assert_eq!(relative_display(Path::new("/work"), base), ".");
        assert_eq!(relative_display(Path::new("/elsewhere/b"), base), "/elsewhere/b");
    }
}
