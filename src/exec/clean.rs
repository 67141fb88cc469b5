// src/exec/clean.rs

//! Removal of intermediate and built files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::GlobSet;
use tracing::{debug, info, warn};

use crate::config::BuildSettings;
use crate::deps::path_utils::normalize_path;
use crate::deps::{included_graphics, walk_files};
use crate::errors::{BakeError, Result};
use crate::fs::FileSystem;

/// Remove the intermediate files that sit next to `file`, one per extension.
///
/// Returns the number of files removed.
pub fn clean_intermediates(
    fs: &dyn FileSystem,
    file: &Path,
    extensions: &[String],
) -> anyhow::Result<usize> {
    let mut removed = 0;
    for ext in extensions {
        let candidate = file.with_extension(ext);
        if candidate == file || !fs.is_file(&candidate) {
            continue;
        }
        fs.remove_file(&candidate)
            .with_context(|| format!("removing intermediate file {:?}", candidate))?;
        debug!(file = %candidate.display(), "removed intermediate file");
        removed += 1;
    }
    Ok(removed)
}

/// Delete built artifacts (intermediate extensions plus the output extension)
/// under `path`, which must lie inside the repository root.
///
/// Graphics pulled in by any document in the repository are kept even when
/// their extension is one of the intermediate ones. Returns the number of
/// files removed.
pub fn remove_built_files(
    fs: &dyn FileSystem,
    settings: &BuildSettings,
    path: &Path,
) -> Result<usize> {
    let target = normalize_path(&settings.root.join(path));
    if !target.starts_with(&settings.root) {
        return Err(BakeError::ConfigError(format!(
            "{:?} is outside the repository {:?}",
            path, settings.root
        )));
    }

    let build = settings.config.build();
    let mut built_extensions: HashSet<&str> = settings
        .config
        .compile()
        .intermediate_extensions
        .iter()
        .map(String::as_str)
        .collect();
    built_extensions.insert(build.output_extension.as_str());

    let protected = protected_graphics(fs, settings)?;

    let files = if fs.is_dir(&target) {
        walk_files(fs, &target, &GlobSet::empty())?
    } else {
        vec![target]
    };

    let mut removed = 0;
    for file in files {
        let is_built = file
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| built_extensions.contains(e));
        if !is_built || protected.contains(&file) {
            continue;
        }
        match fs.remove_file(&file) {
            Ok(()) => {
                debug!(file = %file.display(), "removed built file");
                removed += 1;
            }
            Err(err) => warn!(file = %file.display(), error = %err, "could not remove file"),
        }
    }

    info!(removed, "clean finished");
    Ok(removed)
}

fn protected_graphics(fs: &dyn FileSystem, settings: &BuildSettings) -> Result<HashSet<PathBuf>> {
    let exclude = crate::deps::listing::build_globset(&settings.config.build().exclude)?;
    let source_extension = settings.source_extension();

    let mut protected = HashSet::new();
    for file in walk_files(fs, &settings.root, &exclude)? {
        if file.extension().and_then(|e| e.to_str()) != Some(source_extension) {
            continue;
        }
        match included_graphics(fs, &file) {
            Ok(graphics) => protected.extend(graphics),
            Err(err) => debug!(file = %file.display(), error = %err, "could not scan for graphics"),
        }
    }
    Ok(protected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigFile;
    use crate::fs::mock::MockFileSystem;

    fn settings() -> BuildSettings {
        BuildSettings::new(PathBuf::from("/repo"), None, ConfigFile::default())
    }

    #[test]
    fn intermediates_next_to_file_are_removed() {
        let fs = MockFileSystem::new();
        fs.add_file("/repo/a.tex", "x");
        fs.add_file("/repo/a.aux", "x");
        fs.add_file("/repo/a.dvi", "x");
        fs.add_file("/repo/b.aux", "x");

        let removed = clean_intermediates(
            &fs,
            Path::new("/repo/a.tex"),
            &["aux".to_string(), "dvi".to_string(), "log".to_string()],
        )
        .unwrap();

        assert_eq!(removed, 2);
        assert!(!fs.exists(Path::new("/repo/a.aux")));
        assert!(fs.exists(Path::new("/repo/b.aux")));
        assert!(fs.exists(Path::new("/repo/a.tex")));
    }

    #[test]
    fn built_files_are_removed_but_included_graphics_kept() {
        let fs = MockFileSystem::new();
        fs.add_file(
            "/repo/ch/doc.tex",
            "\\begin{document}\\includegraphics{fig}\\end{document}",
        );
        fs.add_file("/repo/ch/doc.html", "<html></html>");
        fs.add_file("/repo/ch/doc.pdf", "%PDF");
        fs.add_file("/repo/ch/fig.pdf", "%PDF");
        fs.add_file("/repo/ch/notes.txt", "keep");

        let removed = remove_built_files(&fs, &settings(), Path::new("ch")).unwrap();

        assert_eq!(removed, 2);
        assert!(!fs.exists(Path::new("/repo/ch/doc.html")));
        assert!(!fs.exists(Path::new("/repo/ch/doc.pdf")));
        assert!(fs.exists(Path::new("/repo/ch/fig.pdf")));
        assert!(fs.exists(Path::new("/repo/ch/notes.txt")));
        assert!(fs.exists(Path::new("/repo/ch/doc.tex")));
    }

    #[test]
    fn paths_outside_the_repository_are_rejected() {
        let fs = MockFileSystem::new();
        let err = remove_built_files(&fs, &settings(), Path::new("../elsewhere")).unwrap_err();
        assert!(matches!(err, BakeError::ConfigError(_)));
    }
}
