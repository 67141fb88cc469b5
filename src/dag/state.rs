// src/dag/state.rs

//! Coordinator-owned bookkeeping for one build.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::types::{TaskOutcome, TaskState};

/// The four disjoint-by-outcome sets the coordinator maintains.
///
/// `enqueued` contains every file that has been dispatched or skipped;
/// `compiled`, `failed` and `skipped` are pairwise disjoint. Each outcome
/// list also keeps the order in which outcomes were recorded, for reporting.
#[derive(Debug, Default)]
pub struct BuildState {
    enqueued: HashSet<PathBuf>,
    compiled: Vec<PathBuf>,
    failed: Vec<PathBuf>,
    skipped: Vec<PathBuf>,
    compiled_set: HashSet<PathBuf>,
    failed_set: HashSet<PathBuf>,
    skipped_set: HashSet<PathBuf>,
}

impl BuildState {
    pub fn is_enqueued(&self, file: &Path) -> bool {
        self.enqueued.contains(file)
    }

    pub fn mark_dispatched(&mut self, file: &Path) {
        self.enqueued.insert(file.to_path_buf());
    }

    pub fn mark_skipped(&mut self, file: &Path) {
        self.enqueued.insert(file.to_path_buf());
        if self.skipped_set.insert(file.to_path_buf()) {
            self.skipped.push(file.to_path_buf());
        }
    }

    /// Record a worker-reported outcome. Returns `false` if the file already
    /// has an outcome.
    pub fn record(&mut self, file: &Path, outcome: TaskOutcome) -> bool {
        if self.outcome_of(file).is_some() {
            return false;
        }
        let (set, list) = match outcome {
            TaskOutcome::Compiled => (&mut self.compiled_set, &mut self.compiled),
            TaskOutcome::Failed => (&mut self.failed_set, &mut self.failed),
            TaskOutcome::Skipped => (&mut self.skipped_set, &mut self.skipped),
        };
        set.insert(file.to_path_buf());
        list.push(file.to_path_buf());
        true
    }

    pub fn outcome_of(&self, file: &Path) -> Option<TaskOutcome> {
        if self.compiled_set.contains(file) {
            Some(TaskOutcome::Compiled)
        } else if self.failed_set.contains(file) {
            Some(TaskOutcome::Failed)
        } else if self.skipped_set.contains(file) {
            Some(TaskOutcome::Skipped)
        } else {
            None
        }
    }

    /// Whether a dependency blocks its dependents for good.
    pub fn is_broken(&self, file: &Path) -> bool {
        self.failed_set.contains(file) || self.skipped_set.contains(file)
    }

    pub fn is_compiled(&self, file: &Path) -> bool {
        self.compiled_set.contains(file)
    }

    pub fn state_of(&self, file: &Path) -> TaskState {
        match self.outcome_of(file) {
            Some(outcome) => TaskState::Done(outcome),
            None if self.enqueued.contains(file) => TaskState::Dispatched,
            None => TaskState::Pending,
        }
    }

    pub fn enqueued_count(&self) -> usize {
        self.enqueued.len()
    }

    pub fn accounted_count(&self) -> usize {
        self.compiled.len() + self.failed.len() + self.skipped.len()
    }

    pub fn compiled(&self) -> &[PathBuf] {
        &self.compiled
    }

    pub fn failed(&self) -> &[PathBuf] {
        &self.failed
    }

    pub fn skipped(&self) -> &[PathBuf] {
        &self.skipped
    }
}
