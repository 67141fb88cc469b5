// src/config/settings.rs

use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;

/// Worker count used when neither `-j` nor `[build].jobs` is positive.
pub const DEFAULT_WORKERS: usize = 2;

/// Everything a build needs to know about its environment.
///
/// Passed explicitly into every entry point instead of living in globals.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub root: PathBuf,
    pub workers: usize,
    pub config: ConfigFile,
}

impl BuildSettings {
    pub fn new(root: PathBuf, cli_jobs: Option<i64>, config: ConfigFile) -> Self {
        let workers = resolve_workers(cli_jobs, config.build().jobs);
        Self {
            root,
            workers,
            config,
        }
    }

    /// Path of the artifact produced for `input`.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        input.with_extension(&self.config.build().output_extension)
    }

    pub fn source_extension(&self) -> &str {
        &self.config.build().source_extension
    }
}

/// `-j` wins when positive, then `[build].jobs`, then [`DEFAULT_WORKERS`].
pub fn resolve_workers(cli_jobs: Option<i64>, config_jobs: i64) -> usize {
    match cli_jobs {
        Some(n) if n > 0 => n as usize,
        _ if config_jobs > 0 => config_jobs as usize,
        _ => DEFAULT_WORKERS,
    }
}
