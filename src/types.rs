// src/types.rs

use std::fmt;

/// Outcome recorded exactly once per task in a build.
///
/// - `Compiled` / `Failed` are reported by a worker after running the
///   compiler.
/// - `Skipped` is decided by the coordinator when a dependency failed or was
///   itself skipped; the file never reaches a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskOutcome {
    Compiled,
    Failed,
    Skipped,
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskOutcome::Compiled => "compiled",
            TaskOutcome::Failed => "failed",
            TaskOutcome::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Read-only view of where a file currently sits in the scheduler.
///
/// Exposed for tests and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Not part of this build (clean, or unknown).
    NotInBuild,
    /// Waiting on dependencies.
    Pending,
    /// Handed to a worker; no outcome yet.
    Dispatched,
    Done(TaskOutcome),
}
