// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use std::path::PathBuf;

/// Structured result of a single ready-check pass.
///
/// This is useful for tests that want to manually step the scheduler and make
/// assertions about what changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Files whose dependencies are all compiled; hand these to workers.
    pub newly_dispatched: Vec<PathBuf>,
    /// Files skipped in this pass because a dependency failed or was skipped.
    pub newly_skipped: Vec<PathBuf>,
    /// Whether every file has now been dispatched or skipped.
    pub all_enqueued: bool,
}
