// src/deps/mod.rs

//! Source discovery and dependency extraction.
//!
//! - [`listing`] enumerates candidate documents under the repository root.
//! - [`tex`] scans TeX sources for include-like directives.
//! - [`path_utils`] holds the path normalization shared by both.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod listing;
pub mod path_utils;
pub mod tex;

pub use listing::{list_candidate_files, walk_files};
pub use tex::{included_graphics, is_tex_document, TexDependencyExtractor};

/// Produces the list of files a given file depends on.
pub trait DependencyExtractor: Send + Sync {
    fn dependencies(&self, path: &Path) -> Result<Vec<PathBuf>>;
}
