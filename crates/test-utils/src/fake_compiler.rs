use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use texbake::exec::{CompileFuture, Compiler};

/// One call to [`FakeCompiler::compile`].
///
/// `started` and `finished` come from a single shared counter, so for any
/// two records the comparison reflects the real order of events.
#[derive(Debug, Clone)]
pub struct CompileRecord {
    pub task: PathBuf,
    pub started: u64,
    pub finished: u64,
    pub success: bool,
}

/// A fake compiler that:
/// - records when each file started and finished compiling
/// - tracks the peak number of concurrent compilations
/// - fails the files it was told to fail
/// - panics on the files it was told to panic on
#[derive(Debug, Clone, Default)]
pub struct FakeCompiler {
    failing: Arc<HashSet<PathBuf>>,
    panicking: Arc<HashSet<PathBuf>>,
    delay: Duration,
    records: Arc<Mutex<Vec<CompileRecord>>>,
    clock: Arc<AtomicU64>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl FakeCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(mut self, files: &[&str]) -> Self {
        self.failing = Arc::new(files.iter().map(PathBuf::from).collect());
        self
    }

    /// Panic inside `compile` for these files instead of returning.
    pub fn panicking(mut self, files: &[&str]) -> Self {
        self.panicking = Arc::new(files.iter().map(PathBuf::from).collect());
        self
    }

    /// Hold every compilation open for `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn records(&self) -> Vec<CompileRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn record_of(&self, task: &str) -> Option<CompileRecord> {
        let task = Path::new(task);
        self.records().into_iter().find(|r| r.task == task)
    }

    pub fn compiled_files(&self) -> Vec<PathBuf> {
        self.records().into_iter().map(|r| r.task).collect()
    }

    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst)
    }
}

impl Compiler for FakeCompiler {
    fn compile<'a>(&'a self, _root: &'a Path, task: &'a Path) -> CompileFuture<'a> {
        Box::pin(async move {
            if self.panicking.contains(task) {
                panic!("fake compiler panic for {}", task.display());
            }

            let started = self.tick();
            let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now_active, Ordering::SeqCst);

            if self.delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(self.delay).await;
            }

            self.active.fetch_sub(1, Ordering::SeqCst);
            let success = !self.failing.contains(task);
            let finished = self.tick();

            self.records.lock().unwrap().push(CompileRecord {
                task: task.to_path_buf(),
                started,
                finished,
                success,
            });

            if success {
                Ok(format!("compiled {}", task.display()).into_bytes())
            } else {
                Err(anyhow!("fake failure for {}", task.display()))
            }
        })
    }
}
