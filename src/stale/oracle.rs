// src/stale/oracle.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::UNIX_EPOCH;

use anyhow::Result;
use tracing::debug;

use crate::fs::FileSystem;
use crate::stale::hash::compute_file_hash;
use crate::stale::metadata::parse_dependency_records;

/// Decides whether a previously produced output is current for its input.
pub trait StalenessOracle: Send + Sync {
    fn is_up_to_date(&self, input: &Path, output: &Path) -> Result<bool>;
}

/// Modification-time rule.
///
/// A missing output is always stale. A missing input counts as infinitely
/// old. Otherwise the output is stale iff the input is strictly newer.
pub fn is_up_to_date_by_time(fs: &dyn FileSystem, input: &Path, output: &Path) -> bool {
    let output_time = match fs.modified(output) {
        Ok(t) => t,
        Err(_) => return false,
    };
    let input_time = fs.modified(input).unwrap_or(UNIX_EPOCH);

    input_time <= output_time
}

/// Oracle backed by dependency hashes embedded in the output, falling back to
/// modification times when no usable hash is recorded.
#[derive(Debug, Clone)]
pub struct MetadataOracle {
    fs: Arc<dyn FileSystem>,
    root: PathBuf,
    source_extension: String,
}

impl MetadataOracle {
    pub fn new(fs: Arc<dyn FileSystem>, root: PathBuf, source_extension: impl Into<String>) -> Self {
        Self {
            fs,
            root,
            source_extension: source_extension.into(),
        }
    }

    fn is_source(&self, input: &Path) -> bool {
        input
            .extension()
            .is_some_and(|ext| ext == self.source_extension.as_str())
    }
}

impl StalenessOracle for MetadataOracle {
    fn is_up_to_date(&self, input: &Path, output: &Path) -> Result<bool> {
        let fs = self.fs.as_ref();

        if !self.is_source(input) {
            return Ok(is_up_to_date_by_time(fs, input, output));
        }

        let doc = match fs.read_to_string(output) {
            Ok(doc) => doc,
            Err(_) => {
                debug!(input = %input.display(), "output missing or unreadable; stale");
                return Ok(false);
            }
        };

        let mut any_checked = false;
        let mut clean = true;

        for record in parse_dependency_records(&doc) {
            let dep = self.root.join(&record.path);
            let current = match compute_file_hash(fs, &dep) {
                Ok(h) => h,
                Err(err) => {
                    debug!(dependency = %dep.display(), error = %err, "skipping unreadable dependency");
                    continue;
                }
            };

            any_checked = true;
            if current != record.hash {
                debug!(
                    input = %input.display(),
                    dependency = %dep.display(),
                    "not up to date: dependency changed"
                );
                clean = false;
            }
        }

        if !any_checked {
            return Ok(is_up_to_date_by_time(fs, input, output));
        }

        Ok(clean)
    }
}
