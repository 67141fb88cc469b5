// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BakeError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Dependency cycle detected among: {}", display_paths(.files))]
    DependencyCycle { files: Vec<PathBuf> },

    #[error("Could not find a repository (Bake.toml or .git) in {0:?} or any parent directory")]
    RepositoryNotFound(PathBuf),

    /// Nothing is in flight but some files were never enqueued.
    #[error("Scheduler stalled with unsatisfiable dependencies: {}", display_paths(.pending))]
    SchedulerStalled { pending: Vec<PathBuf> },

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BakeError>;
