// src/stale/metadata.rs

//! Per-dependency content hashes embedded in output artifacts.
//!
//! Each compiled document carries one tag per file that went into it:
//!
//! ```html
//! <meta name="dependency" content="<blake3-hex> <path relative to root>">
//! ```
//!
//! The staleness oracle re-hashes every listed file and compares.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::deps::path_utils::relative_str;
use crate::fs::FileSystem;
use crate::stale::hash::compute_file_hash;

static META_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<meta\b[^>]*>\n?").expect("static regex"));
static DEPENDENCY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bname\s*=\s*"dependency""#).expect("static regex"));
static CONTENT_ATTR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)\bcontent\s*=\s*"([^"]*)""#).expect("static regex"));
static HEAD_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("static regex"));

/// One recorded dependency: its hash at compile time and its path relative
/// to the repository root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    pub hash: String,
    pub path: PathBuf,
}

impl DependencyRecord {
    fn to_tag(&self) -> String {
        let content = format!("{} {}", self.hash, self.path.to_string_lossy().replace('\\', "/"));
        format!(r#"<meta name="dependency" content="{}">"#, escape_attr(&content))
    }
}

/// Extract all dependency records from an output document.
///
/// Tags without a `content` attribute, or whose content has fewer than two
/// fields, are ignored.
pub fn parse_dependency_records(doc: &str) -> Vec<DependencyRecord> {
    let mut records = Vec::new();

    for tag in META_TAG.find_iter(doc) {
        let tag = tag.as_str();
        if !DEPENDENCY_NAME.is_match(tag) {
            continue;
        }

        let Some(content) = CONTENT_ATTR.captures(tag).map(|c| unescape_attr(&c[1])) else {
            warn!(tag = %tag.trim(), "dependency meta tag is missing a content attribute");
            continue;
        };

        let trimmed = content.trim();
        if let Some((hash, path)) = trimmed.split_once(char::is_whitespace) {
            let path = path.trim_start();
            if !path.is_empty() {
                records.push(DependencyRecord {
                    hash: hash.to_string(),
                    path: PathBuf::from(path),
                });
            }
        }
    }

    records
}

/// Rewrite `output` so it records the current hashes of `dependencies`.
///
/// Existing dependency tags are replaced. Dependencies that cannot be read
/// or lie outside `root` are left out. Returns the number of tags written.
pub fn stamp_dependencies(
    fs: &dyn FileSystem,
    root: &Path,
    output: &Path,
    dependencies: &[PathBuf],
) -> Result<usize> {
    let doc = fs
        .read_to_string(output)
        .with_context(|| format!("reading output for stamping: {:?}", output))?;

    let mut records = Vec::with_capacity(dependencies.len());
    for dep in dependencies {
        let Some(rel) = relative_str(root, dep) else {
            debug!(dependency = %dep.display(), "dependency outside repository; not recorded");
            continue;
        };
        match compute_file_hash(fs, dep) {
            Ok(hash) => records.push(DependencyRecord {
                hash,
                path: PathBuf::from(rel),
            }),
            Err(err) => {
                debug!(dependency = %dep.display(), error = %err, "could not hash dependency; not recorded");
            }
        }
    }

    let stamped = with_dependency_records(&doc, &records);
    fs.write(output, stamped.as_bytes())?;
    Ok(records.len())
}

/// Replace every dependency tag in `doc` with tags for `records`.
pub fn with_dependency_records(doc: &str, records: &[DependencyRecord]) -> String {
    let stripped = META_TAG.replace_all(doc, |caps: &Captures| {
        if DEPENDENCY_NAME.is_match(&caps[0]) {
            String::new()
        } else {
            caps[0].to_string()
        }
    });

    let tags: String = records.iter().map(|r| r.to_tag() + "\n").collect();

    match HEAD_CLOSE.find(&stripped) {
        Some(m) => {
            let mut out = String::with_capacity(stripped.len() + tags.len());
            out.push_str(&stripped[..m.start()]);
            out.push_str(&tags);
            out.push_str(&stripped[m.start()..]);
            out
        }
        None => tags + &stripped,
    }
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_attr(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
