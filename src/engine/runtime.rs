// src/engine/runtime.rs

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::dag::Scheduler;
use crate::errors::{BakeError, Result};
use crate::exec::worker::spawn_worker;
use crate::exec::Compiler;

use super::progress::ProgressReporter;
use super::summary::BuildSummary;
use super::{Completion, RuntimeOptions};

/// Drives the [`Scheduler`] against a pool of workers running a [`Compiler`].
///
/// This is the IO shell: it owns the channels and the worker tasks, while
/// every scheduling decision is made by the scheduler. The coordinator is the
/// only place that mutates build state.
pub struct BuildRuntime {
    scheduler: Scheduler,
    compiler: Arc<dyn Compiler>,
    root: PathBuf,
    options: RuntimeOptions,
}

impl fmt::Debug for BuildRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildRuntime")
            .field("scheduler", &self.scheduler)
            .field("root", &self.root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl BuildRuntime {
    pub fn new(
        scheduler: Scheduler,
        compiler: Arc<dyn Compiler>,
        root: PathBuf,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            scheduler,
            compiler,
            root,
            options,
        }
    }

    /// Run the build to completion.
    ///
    /// - Dispatches ready files over a capacity-1 work channel, so a send
    ///   waits until some worker is free.
    /// - Waits for one completion at a time while nothing else is ready.
    /// - Once every file is dispatched or skipped, closes the work channel,
    ///   collects the outstanding completions and joins the workers.
    ///
    /// `progress.increment()` is called once per file.
    pub async fn run(mut self, progress: &mut dyn ProgressReporter) -> Result<BuildSummary> {
        let total = self.scheduler.total();
        progress.start(total);

        if total == 0 {
            progress.finish("nothing to compile");
            return Ok(self.scheduler.summary());
        }

        let workers = self.options.workers.max(1);
        info!(files = total, workers, "build runtime started");

        let (work_tx, work_rx) = mpsc::channel::<PathBuf>(1);
        let work_rx = Arc::new(Mutex::new(work_rx));
        let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

        let handles: Vec<_> = (0..workers)
            .map(|id| {
                spawn_worker(
                    id,
                    Arc::clone(&work_rx),
                    done_tx.clone(),
                    Arc::clone(&self.compiler),
                    self.root.clone(),
                )
            })
            .collect();
        // Workers hold the only senders now, so `recv` returns `None` once
        // they have all exited.
        drop(done_tx);

        loop {
            let step = self.scheduler.step_ready();

            for file in &step.newly_skipped {
                warn!(file = %file.display(), "skipped because a dependency did not compile");
                progress.increment();
            }

            for file in step.newly_dispatched {
                debug!(file = %file.display(), "dispatching to worker pool");
                work_tx
                    .send(file)
                    .await
                    .map_err(|_| BakeError::ChannelClosed("work channel".to_string()))?;
            }

            if step.all_enqueued {
                break;
            }

            if self.scheduler.in_flight() == 0 {
                return Err(BakeError::SchedulerStalled {
                    pending: self.scheduler.pending(),
                });
            }

            self.receive_one(&mut done_rx, progress).await?;
        }

        drop(work_tx);
        debug!("all files enqueued; waiting for in-flight compilations");

        while !self.scheduler.is_finished() {
            self.receive_one(&mut done_rx, progress).await?;
        }

        for handle in handles {
            if let Err(err) = handle.await {
                warn!(error = %err, "worker task ended abnormally");
            }
        }

        let summary = self.scheduler.summary();
        progress.finish(&format!(
            "build finished: {} compiled, {} failed, {} skipped",
            summary.compiled.len(),
            summary.failed.len(),
            summary.skipped.len()
        ));
        Ok(summary)
    }

    async fn receive_one(
        &mut self,
        done_rx: &mut mpsc::UnboundedReceiver<Completion>,
        progress: &mut dyn ProgressReporter,
    ) -> Result<()> {
        let completion = done_rx
            .recv()
            .await
            .ok_or_else(|| BakeError::ChannelClosed("completion channel".to_string()))?;

        debug!(
            file = %completion.task.display(),
            outcome = %completion.outcome,
            "runtime received completion"
        );
        self.scheduler.record(&completion.task, completion.outcome);
        progress.increment();
        Ok(())
    }
}
