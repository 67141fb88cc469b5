// src/exec/worker.rs

//! Worker loop: pull a file, compile it, report the outcome.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::engine::Completion;
use crate::exec::Compiler;
use crate::types::TaskOutcome;

/// Compile `task` in its own tokio task so a panicking compiler still yields
/// a report for the file.
async fn run_compile(
    compiler: &Arc<dyn Compiler>,
    root: &Path,
    task: &Path,
) -> anyhow::Result<()> {
    let compiler = Arc::clone(compiler);
    let root = root.to_path_buf();
    let task = task.to_path_buf();
    match tokio::spawn(async move { compiler.compile(&root, &task).await }).await {
        Ok(Ok(_output)) => Ok(()),
        Ok(Err(err)) => Err(err),
        Err(join) if join.is_panic() => Err(anyhow!("compiler panicked")),
        Err(join) => Err(anyhow!("compile task cancelled: {join}")),
    }
}

/// Spawn one worker sharing `work_rx` with its siblings.
///
/// The worker exits when the work channel is closed and drained, or when the
/// coordinator has dropped the completion receiver. It never makes a
/// scheduling decision. Every file it takes off the channel gets exactly one
/// [`Completion`], even if the compiler panics.
pub fn spawn_worker(
    id: usize,
    work_rx: Arc<Mutex<mpsc::Receiver<PathBuf>>>,
    done_tx: mpsc::UnboundedSender<Completion>,
    compiler: Arc<dyn Compiler>,
    root: PathBuf,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!(worker = id, "worker started");

        loop {
            let next = {
                let mut rx = work_rx.lock().await;
                rx.recv().await
            };
            let Some(task) = next else {
                break;
            };

            info!(worker = id, file = %task.display(), "compiling");
            let outcome = match run_compile(&compiler, &root, &task).await {
                Ok(()) => TaskOutcome::Compiled,
                Err(err) => {
                    error!(
                        worker = id,
                        file = %task.display(),
                        error = %format!("{err:#}"),
                        "compilation failed"
                    );
                    TaskOutcome::Failed
                }
            };

            if done_tx.send(Completion { task, outcome }).is_err() {
                debug!(worker = id, "completion receiver dropped; stopping");
                break;
            }
        }

        debug!(worker = id, "worker finished");
    })
}
