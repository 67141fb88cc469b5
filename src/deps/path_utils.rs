// src/deps/path_utils.rs

//! Path helpers shared by listing, extraction and dependency metadata.

use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drop `.` components and fold `..` into the
/// preceding component. Does not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Returns `None` if `path` is not under `root`.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_parent_and_current_components() {
        assert_eq!(
            normalize_path(Path::new("/repo/ch1/../ch2/./b.tex")),
            PathBuf::from("/repo/ch2/b.tex")
        );
        assert_eq!(normalize_path(Path::new("/../a.tex")), PathBuf::from("/a.tex"));
        assert_eq!(normalize_path(Path::new("../a.tex")), PathBuf::from("../a.tex"));
    }

    #[test]
    fn relative_str_uses_forward_slashes() {
        assert_eq!(
            relative_str(Path::new("/repo"), Path::new("/repo/ch1/a.tex")).as_deref(),
            Some("ch1/a.tex")
        );
        assert_eq!(relative_str(Path::new("/repo"), Path::new("/other/a.tex")), None);
    }
}
