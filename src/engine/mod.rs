// src/engine/mod.rs

//! Build execution engine.
//!
//! The pure bookkeeping lives in [`crate::dag::Scheduler`]; this module is
//! the async shell around it:
//! - [`runtime`] owns the coordinator loop and the worker pool
//! - [`progress`] defines how progress is reported
//! - [`summary`] holds the final accounting

use std::path::PathBuf;

use crate::types::TaskOutcome;

/// Runtime options for one build.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeOptions {
    /// Number of concurrent workers. Zero is treated as one.
    pub workers: usize,
}

/// Outcome reported by a worker for one file.
#[derive(Debug, Clone)]
pub struct Completion {
    pub task: PathBuf,
    pub outcome: TaskOutcome,
}

pub mod progress;
pub mod runtime;
pub mod summary;

pub use progress::{LogProgress, NullProgress, ProgressReporter};
pub use runtime::BuildRuntime;
pub use summary::BuildSummary;
