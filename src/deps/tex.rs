// src/deps/tex.rs

//! Include-directive scanning for TeX sources.

use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::trace;

use crate::deps::DependencyExtractor;
use crate::deps::path_utils::normalize_path;
use crate::fs::FileSystem;

static COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)(^|[^\\])%.*$").expect("static regex"));
static VERBATIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\\begin\s*\{verbatim\}.*?\\end\s*\{verbatim\}").expect("static regex")
});
static BEGIN_DOCUMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\begin\s*\{\s*document\s*\}").expect("static regex"));
static INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\(input|activity|include|includeonly)\s*\{([^}]+)\}").expect("static regex")
});
static GRAPHICS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\includegraphics\s*(?:\[[^\]]*\])?\s*\{([^}]+)\}").expect("static regex")
});

/// Extensions tried, in order, when `\includegraphics` names a file without one.
const GRAPHICS_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "svg"];

/// Read a TeX file with comments and `verbatim` environments removed.
pub fn read_tex_code(fs: &dyn FileSystem, path: &Path) -> Result<String> {
    let raw = fs
        .read_to_string(path)
        .with_context(|| format!("reading TeX source {:?}", path))?;
    Ok(strip_tex_noise(&raw))
}

fn strip_tex_noise(raw: &str) -> String {
    let without_comments = COMMENT.replace_all(raw, "${1}");
    VERBATIM.replace_all(&without_comments, "").into_owned()
}

/// True if `path` has the source extension and contains `\begin{document}`
/// outside of comments.
pub fn is_tex_document(fs: &dyn FileSystem, path: &Path, source_extension: &str) -> Result<bool> {
    if !path.extension().is_some_and(|e| e == source_extension) {
        return Ok(false);
    }
    let code = read_tex_code(fs, path)?;
    Ok(BEGIN_DOCUMENT.is_match(&code))
}

/// Resolve `name` relative to `dir`: the path itself if it is a file,
/// otherwise the first `name.<ext>` that is.
fn resolve_relative(
    fs: &dyn FileSystem,
    dir: &Path,
    name: &str,
    fallback_extensions: &[&str],
) -> Option<PathBuf> {
    let candidate = normalize_path(&dir.join(name.trim()));
    if fs.is_file(&candidate) {
        return Some(candidate);
    }

    fallback_extensions.iter().find_map(|ext| {
        let mut with_ext = candidate.clone().into_os_string();
        with_ext.push(".");
        with_ext.push(ext);
        let with_ext = PathBuf::from(with_ext);
        fs.is_file(&with_ext).then_some(with_ext)
    })
}

/// Extracts `\input`, `\include`, `\includeonly` and `\activity` targets.
#[derive(Debug, Clone)]
pub struct TexDependencyExtractor {
    fs: Arc<dyn FileSystem>,
    source_extension: String,
}

impl TexDependencyExtractor {
    pub fn new(fs: Arc<dyn FileSystem>, source_extension: impl Into<String>) -> Self {
        Self {
            fs,
            source_extension: source_extension.into(),
        }
    }
}

impl DependencyExtractor for TexDependencyExtractor {
    fn dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let fs = self.fs.as_ref();
        let code = read_tex_code(fs, path)?;
        let dir = path.parent().unwrap_or_else(|| Path::new("."));

        let mut deps: Vec<PathBuf> = Vec::new();
        for caps in INCLUDE.captures_iter(&code) {
            let names: Vec<&str> = if &caps[1] == "includeonly" {
                caps[2].split(',').collect()
            } else {
                vec![&caps[2]]
            };

            for name in names {
                match resolve_relative(fs, dir, name, &[self.source_extension.as_str()]) {
                    Some(dep) if !deps.contains(&dep) => deps.push(dep),
                    Some(_) => {}
                    None => trace!(file = %path.display(), name, "include target not found; ignored"),
                }
            }
        }

        Ok(deps)
    }
}

/// Graphics pulled in with `\includegraphics`, resolved to existing files.
pub fn included_graphics(fs: &dyn FileSystem, path: &Path) -> Result<Vec<PathBuf>> {
    let code = read_tex_code(fs, path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    Ok(GRAPHICS
        .captures_iter(&code)
        .filter_map(|caps| resolve_relative(fs, dir, &caps[1], GRAPHICS_EXTENSIONS))
        .collect())
}
