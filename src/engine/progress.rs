// src/engine/progress.rs

//! Progress reporting for a running build.

use tracing::info;

/// Receives build progress from the coordinator.
///
/// `increment` is called exactly once per file, whatever its outcome, so a
/// reporter always reaches `total`.
pub trait ProgressReporter: Send {
    fn start(&mut self, total: usize);
    fn increment(&mut self);
    fn finish(&mut self, message: &str);
}

/// Reports progress through `tracing` at `info` level.
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Files accounted for so far, whatever their outcome.
    fn status_line(&self) -> String {
        format!("finished {}/{}", self.done, self.total)
    }
}

impl ProgressReporter for LogProgress {
    fn start(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
        info!(total, "starting build");
    }

    fn increment(&mut self) {
        self.done += 1;
        info!("{}", self.status_line());
    }

    fn finish(&mut self, message: &str) {
        info!("{message}");
    }
}

/// Discards all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProgress;

impl ProgressReporter for NullProgress {
    fn start(&mut self, _total: usize) {}
    fn increment(&mut self) {}
    fn finish(&mut self, _message: &str) {}
}
