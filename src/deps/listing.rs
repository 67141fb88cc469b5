// src/deps/listing.rs

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::config::BuildSettings;
use crate::deps::path_utils::relative_str;
use crate::deps::tex::is_tex_document;
use crate::fs::FileSystem;

/// Build a GlobSet from simple string patterns.
pub(crate) fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with('.'))
}

/// Recursively list every file under `root`, skipping hidden directories and
/// anything matching `exclude`.
///
/// Failing to read `root` itself is an error; unreadable subdirectories are
/// skipped with a warning.
pub fn walk_files(fs: &dyn FileSystem, root: &Path, exclude: &GlobSet) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        let entries = match fs.read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if dir == root => return Err(err),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "cannot read directory; skipping");
                continue;
            }
        };

        for path in entries {
            if let Some(rel) = relative_str(root, &path) {
                if exclude.is_match(&rel) {
                    debug!(path = %rel, "excluded by [build].exclude");
                    continue;
                }
            }

            if fs.is_dir(&path) {
                if !is_hidden(&path) {
                    stack.push(path);
                }
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Enumerate build-eligible documents under the repository root.
///
/// A candidate has the source extension and contains `\begin{document}`.
/// Files that cannot be read are not candidates.
pub fn list_candidate_files(fs: &dyn FileSystem, settings: &BuildSettings) -> Result<Vec<PathBuf>> {
    let exclude = build_globset(&settings.config.build().exclude)?;
    let ext = settings.source_extension();

    debug!(root = %settings.root.display(), "recursively listing candidate documents");

    let candidates = walk_files(fs, &settings.root, &exclude)?
        .into_iter()
        .filter(|path| match is_tex_document(fs, path, ext) {
            Ok(is_doc) => is_doc,
            Err(err) => {
                debug!(file = %path.display(), error = %err, "ignoring unreadable file");
                false
            }
        })
        .collect();

    Ok(candidates)
}
