// src/dag/scheduler.rs

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::dag::planner::BuildPlan;
use crate::dag::scheduler_step::SchedulerStep;
use crate::dag::state::BuildState;
use crate::engine::BuildSummary;
use crate::types::{TaskOutcome, TaskState};

/// Scheduler holds the build order plus the mutable per-build state.
///
/// It is responsible for:
/// - deciding when a file is ready to dispatch (all dependencies compiled)
/// - skipping files whose dependencies failed or were skipped
/// - recording worker-reported outcomes
///
/// It never touches channels or the filesystem; the runtime feeds it
/// completions and forwards whatever it dispatches.
#[derive(Debug)]
pub struct Scheduler {
    order: Vec<PathBuf>,
    deps: HashMap<PathBuf, Vec<PathBuf>>,
    in_build: HashSet<PathBuf>,
    state: BuildState,
}

impl Scheduler {
    /// Construct a scheduler from a build order and per-file dependencies.
    ///
    /// Duplicate entries in `order` are dropped. Dependencies that are not
    /// part of the build are treated as already satisfied.
    pub fn new(order: Vec<PathBuf>, deps: HashMap<PathBuf, Vec<PathBuf>>) -> Self {
        let mut in_build = HashSet::new();
        let order: Vec<PathBuf> = order
            .into_iter()
            .filter(|file| in_build.insert(file.clone()))
            .collect();

        let deps = deps
            .into_iter()
            .filter(|(file, _)| in_build.contains(file))
            .map(|(file, file_deps)| {
                let kept: Vec<PathBuf> = file_deps
                    .into_iter()
                    .filter(|d| in_build.contains(d))
                    .collect();
                (file, kept)
            })
            .collect();

        Self {
            order,
            deps,
            in_build,
            state: BuildState::default(),
        }
    }

    pub fn from_plan(plan: &BuildPlan) -> Self {
        Self::new(plan.order.clone(), plan.dependencies.clone())
    }

    /// Number of files in the build.
    pub fn total(&self) -> usize {
        self.order.len()
    }

    pub fn order(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn dependencies_of(&self, file: &Path) -> &[PathBuf] {
        self.deps.get(file).map(Vec::as_slice).unwrap_or(&[])
    }

    /// One ready-check pass over the build order.
    ///
    /// A file with a failed or skipped dependency is skipped; a file whose
    /// dependencies are all compiled is dispatched. Skips cascade within the
    /// same pass because dependents come later in the order.
    pub fn step_ready(&mut self) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        for file in &self.order {
            if self.state.is_enqueued(file) {
                continue;
            }
            let file_deps = self.deps.get(file).map(Vec::as_slice).unwrap_or(&[]);

            if let Some(broken) = file_deps.iter().find(|d| self.state.is_broken(d)) {
                debug!(
                    file = %file.display(),
                    dependency = %broken.display(),
                    "skipping because a dependency did not compile"
                );
                self.state.mark_skipped(file);
                step.newly_skipped.push(file.clone());
                continue;
            }

            if file_deps.iter().all(|d| self.state.is_compiled(d)) {
                debug!(file = %file.display(), "dependencies satisfied; dispatching");
                self.state.mark_dispatched(file);
                step.newly_dispatched.push(file.clone());
            }
        }

        step.all_enqueued = self.all_enqueued();
        step
    }

    /// Record the outcome a worker reported for `file`.
    ///
    /// Only `Compiled` and `Failed` are meaningful here; skips are decided by
    /// the scheduler itself. Unknown files and repeated reports are ignored.
    pub fn record(&mut self, file: &Path, outcome: TaskOutcome) {
        if !self.in_build.contains(file) {
            warn!(file = %file.display(), "completion for a file outside this build; ignoring");
            return;
        }
        if outcome == TaskOutcome::Skipped {
            warn!(file = %file.display(), "workers never report skips; ignoring");
            return;
        }
        if !self.state.is_enqueued(file) {
            warn!(file = %file.display(), "completion for a file that was never dispatched; ignoring");
            return;
        }
        if !self.state.record(file, outcome) {
            warn!(file = %file.display(), %outcome, "duplicate completion; ignoring");
            return;
        }
        debug!(file = %file.display(), %outcome, "recorded outcome");
    }

    /// Whether every file has been dispatched or skipped.
    pub fn all_enqueued(&self) -> bool {
        self.state.enqueued_count() == self.order.len()
    }

    /// Whether every file has an outcome.
    pub fn is_finished(&self) -> bool {
        self.state.accounted_count() == self.order.len()
    }

    pub fn state_of(&self, file: &Path) -> TaskState {
        if !self.in_build.contains(file) {
            return TaskState::NotInBuild;
        }
        self.state.state_of(file)
    }

    /// Files not yet dispatched or skipped, in build order.
    pub fn pending(&self) -> Vec<PathBuf> {
        self.order
            .iter()
            .filter(|f| !self.state.is_enqueued(f))
            .cloned()
            .collect()
    }

    /// Number of files dispatched whose outcome has not arrived yet.
    pub fn in_flight(&self) -> usize {
        self.state.enqueued_count() - self.state.accounted_count()
    }

    pub fn summary(&self) -> BuildSummary {
        BuildSummary {
            compiled: self.state.compiled().to_vec(),
            failed: self.state.failed().to_vec(),
            skipped: self.state.skipped().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> PathBuf {
        PathBuf::from(s)
    }

    fn chain() -> Scheduler {
        let mut deps = HashMap::new();
        deps.insert(p("b"), vec![p("a")]);
        deps.insert(p("c"), vec![p("b"), p("outside")]);
        Scheduler::new(vec![p("a"), p("b"), p("a"), p("c")], deps)
    }

    #[test]
    fn duplicates_are_dropped_and_outside_deps_ignored() {
        let s = chain();
        assert_eq!(s.total(), 3);
        assert_eq!(s.dependencies_of(&p("c")), &[p("b")]);
        assert_eq!(s.state_of(&p("outside")), TaskState::NotInBuild);
    }

    #[test]
    fn dispatches_in_dependency_order() {
        let mut s = chain();

        let step = s.step_ready();
        assert_eq!(step.newly_dispatched, vec![p("a")]);
        assert!(!step.all_enqueued);
        assert_eq!(s.state_of(&p("a")), TaskState::Dispatched);
        assert_eq!(s.state_of(&p("b")), TaskState::Pending);

        s.record(&p("a"), TaskOutcome::Compiled);
        assert_eq!(s.step_ready().newly_dispatched, vec![p("b")]);

        s.record(&p("b"), TaskOutcome::Compiled);
        let step = s.step_ready();
        assert_eq!(step.newly_dispatched, vec![p("c")]);
        assert!(step.all_enqueued);
        assert!(!s.is_finished());

        s.record(&p("c"), TaskOutcome::Compiled);
        assert!(s.is_finished());
        assert_eq!(s.summary().compiled, vec![p("a"), p("b"), p("c")]);
    }

    #[test]
    fn failure_cascades_to_transitive_dependents_in_one_pass() {
        let mut s = chain();
        s.step_ready();
        s.record(&p("a"), TaskOutcome::Failed);

        let step = s.step_ready();
        assert!(step.newly_dispatched.is_empty());
        assert_eq!(step.newly_skipped, vec![p("b"), p("c")]);
        assert!(step.all_enqueued);
        assert!(s.is_finished());
        assert_eq!(s.state_of(&p("c")), TaskState::Done(TaskOutcome::Skipped));
    }

    #[test]
    fn bogus_reports_are_ignored() {
        let mut s = chain();
        s.record(&p("b"), TaskOutcome::Compiled);
        assert_eq!(s.state_of(&p("b")), TaskState::Pending);

        s.step_ready();
        s.record(&p("a"), TaskOutcome::Skipped);
        assert_eq!(s.state_of(&p("a")), TaskState::Dispatched);

        s.record(&p("a"), TaskOutcome::Compiled);
        s.record(&p("a"), TaskOutcome::Failed);
        assert_eq!(s.state_of(&p("a")), TaskState::Done(TaskOutcome::Compiled));
        assert_eq!(s.in_flight(), 0);
    }

    #[test]
    fn empty_build_is_finished_immediately() {
        let mut s = Scheduler::new(Vec::new(), HashMap::new());
        let step = s.step_ready();
        assert!(step.all_enqueued);
        assert!(s.is_finished());
    }
}
